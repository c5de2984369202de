use urlencoding::encode;

/// URL builder for the backend's REST resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// `POST /post`
    pub fn posts(&self) -> String {
        format!("{}/post", self.base)
    }

    /// `GET /post?sortBy=id&order=desc`
    pub fn posts_listing(&self) -> String {
        format!("{}/post?sortBy=id&order=desc", self.base)
    }

    /// `GET | PUT | DELETE /post/:id`
    pub fn post(&self, post_id: &str) -> String {
        format!("{}/post/{}", self.base, encode(post_id))
    }

    /// `GET | POST /post/:id/comment`
    pub fn comments(&self, post_id: &str) -> String {
        format!("{}/post/{}/comment", self.base, encode(post_id))
    }

    /// `PUT | DELETE /post/:id/comment/:commentId`
    pub fn comment(&self, post_id: &str, comment_id: &str) -> String {
        format!(
            "{}/post/{}/comment/{}",
            self.base,
            encode(post_id),
            encode(comment_id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_resource_urls() {
        let e = Endpoints::new("https://api.example.com/v1/");
        assert_eq!(e.posts(), "https://api.example.com/v1/post");
        assert_eq!(
            e.posts_listing(),
            "https://api.example.com/v1/post?sortBy=id&order=desc"
        );
        assert_eq!(e.post("12"), "https://api.example.com/v1/post/12");
        assert_eq!(
            e.comment("12", "7"),
            "https://api.example.com/v1/post/12/comment/7"
        );
    }

    #[test]
    fn empty_base_gives_relative_paths() {
        let e = Endpoints::new("");
        assert_eq!(e.comments("3"), "/post/3/comment");
    }

    #[test]
    fn segments_are_encoded() {
        let e = Endpoints::new("");
        assert_eq!(e.post("a/b c"), "/post/a%2Fb%20c");
    }
}
