use crate::routes::Endpoints;

/// Environment variable holding the backend base URL.
pub const API_URL_VAR: &str = "QUILLPOST_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// First non-blank source wins. With none, warn and fall back to
    /// relative URLs on the serving origin.
    pub fn resolve<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let base_url = sources
            .into_iter()
            .flatten()
            .map(|s| s.as_ref().trim().to_owned())
            .find(|s| !s.is_empty());
        match base_url {
            Some(base_url) => Self { base_url },
            None => {
                tracing::warn!(
                    "{API_URL_VAR} is not set; requests will go to the page's own origin"
                );
                Self::default()
            }
        }
    }

    /// Read the base URL from the process environment.
    pub fn from_env() -> Self {
        Self::resolve([std::env::var(API_URL_VAR).ok()])
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.base_url)
    }
}
