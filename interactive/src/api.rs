use gloo_net::http::{Request, RequestBuilder, Response};
use quillpost_shared::config::API_URL_VAR;
use quillpost_shared::{ApiConfig, RepositoryError};
use serde::Serialize;
use serde_json::Value;
use web_sys::window;

/// Backend base URL: the page's `<meta name="quillpost-api">` tag first,
/// then `QUILLPOST_API_URL` captured at build time.
pub fn config() -> ApiConfig {
    let from_env = option_env!("QUILLPOST_API_URL").map(String::from);
    tracing::debug!(var = API_URL_VAR, set = from_env.is_some(), "resolving API base URL");
    ApiConfig::resolve([meta_api_url(), from_env])
}

fn meta_api_url() -> Option<String> {
    let document = window()?.document()?;
    document
        .query_selector("meta[name='quillpost-api']")
        .ok()
        .flatten()?
        .get_attribute("content")
}

fn network(e: gloo_net::Error) -> RepositoryError {
    RepositoryError::Network(e.to_string())
}

async fn send(req: Request) -> Result<Response, RepositoryError> {
    let resp = req.send().await.map_err(network)?;
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status, url = %resp.url(), "API error");
        return Err(RepositoryError::Status { status, body });
    }
    Ok(resp)
}

/// The server answered, so a body that fails to parse is a payload problem.
fn decode(e: gloo_net::Error) -> RepositoryError {
    RepositoryError::Decode(e.to_string())
}

async fn json_body(resp: Response) -> Result<Value, RepositoryError> {
    resp.json::<Value>().await.map_err(decode)
}

fn with_body<B: Serialize>(req: RequestBuilder, body: &B) -> Result<Request, RepositoryError> {
    let payload = serde_json::to_string(body)?;
    req.header("Content-Type", "application/json")
        .body(payload)
        .map_err(network)
}

pub async fn get(url: &str) -> Result<Value, RepositoryError> {
    let req = Request::get(url).build().map_err(network)?;
    json_body(send(req).await?).await
}

pub async fn post<B: Serialize>(url: &str, body: &B) -> Result<Value, RepositoryError> {
    let req = with_body(Request::post(url), body)?;
    json_body(send(req).await?).await
}

pub async fn put<B: Serialize>(url: &str, body: &B) -> Result<Value, RepositoryError> {
    let req = with_body(Request::put(url), body)?;
    json_body(send(req).await?).await
}

/// The response body, if any, is ignored.
pub async fn delete(url: &str) -> Result<(), RepositoryError> {
    let req = Request::delete(url).build().map_err(network)?;
    send(req).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_body_maps_to_decode() {
        let parse = serde_json::from_str::<Value>("<html>").unwrap_err();
        let err = decode(gloo_net::Error::SerdeError(parse));
        assert!(matches!(err, RepositoryError::Decode(_)), "{err:?}");
        assert_eq!(err.user_message(), "The server sent an unexpected response");
    }

    #[test]
    fn transport_failure_maps_to_network() {
        let err = network(gloo_net::Error::GlooError("connection refused".into()));
        assert!(matches!(err, RepositoryError::Network(_)), "{err:?}");
    }
}
