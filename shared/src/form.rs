use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Comment, Post};
use crate::error::FormErrors;

pub const TITLE_MAX_CHARS: usize = 200;

// ── Posts ──

/// Body of `POST /post` and `PUT /post/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub name: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PostForm {
    /// Prefill an edit form from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            name: post.name.clone(),
            avatar: post.avatar.clone(),
            created_at: None,
        }
    }

    pub fn stamped(mut self) -> Self {
        self.created_at = Some(now_iso());
        self
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.title.trim().is_empty() {
            errors.push("title", "Title is required");
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.push("title", "Title is too long");
        }
        check_common(&mut errors, &self.content, &self.name, &self.avatar);
        errors.into_result()
    }
}

// ── Comments ──

/// Body of `POST /post/:id/comment` and `PUT /post/:id/comment/:commentId`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentForm {
    pub content: String,
    pub name: String,
    pub avatar: String,
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl CommentForm {
    pub fn reply_to(parent_id: Option<String>) -> Self {
        Self {
            parent_id,
            ..Self::default()
        }
    }

    /// Prefill an edit form from an existing comment, keeping its place in the thread.
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            content: comment.content.clone(),
            name: comment.name.clone(),
            avatar: comment.avatar.clone(),
            parent_id: comment.parent_id.clone(),
            created_at: None,
        }
    }

    pub fn stamped(mut self) -> Self {
        self.created_at = Some(now_iso());
        self
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_common(&mut errors, &self.content, &self.name, &self.avatar);
        errors.into_result()
    }
}

fn check_common(errors: &mut FormErrors, content: &str, name: &str, avatar: &str) {
    if content.trim().is_empty() {
        errors.push("content", "Content is required");
    }
    if name.trim().is_empty() {
        errors.push("name", "Name is required");
    }
    if !avatar.is_empty() && !is_web_url(avatar) {
        errors.push("avatar", "Must be a valid URL");
    }
}

fn is_web_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_form() -> PostForm {
        PostForm {
            title: "Hello".into(),
            content: "World".into(),
            name: "Ada".into(),
            avatar: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn valid_post_form_passes() {
        assert!(post_form().validate().is_ok());
        let with_avatar = PostForm {
            avatar: "https://example.com/a.png".into(),
            ..post_form()
        };
        assert!(with_avatar.validate().is_ok());
    }

    #[test]
    fn every_failing_field_is_listed() {
        let form = PostForm {
            title: " ".into(),
            content: String::new(),
            name: String::new(),
            avatar: "not a url".into(),
            created_at: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("content"), Some("Content is required"));
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("avatar"), Some("Must be a valid URL"));
    }

    #[test]
    fn title_limit_counts_characters() {
        let at_limit = PostForm {
            title: "é".repeat(TITLE_MAX_CHARS),
            ..post_form()
        };
        assert!(at_limit.validate().is_ok());

        let over = PostForm {
            title: "a".repeat(TITLE_MAX_CHARS + 1),
            ..post_form()
        };
        assert_eq!(
            over.validate().unwrap_err().get("title"),
            Some("Title is too long")
        );
    }

    #[test]
    fn avatar_must_be_web_url() {
        let form = CommentForm {
            content: "hi".into(),
            name: "Bo".into(),
            avatar: "ftp://example.com/a.png".into(),
            ..CommentForm::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn wire_shape() {
        let body = serde_json::to_value(CommentForm {
            content: "hi".into(),
            name: "Bo".into(),
            avatar: String::new(),
            parent_id: None,
            created_at: None,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"content": "hi", "name": "Bo", "avatar": "", "parentId": null})
        );

        let stamped = serde_json::to_value(post_form().stamped()).unwrap();
        let created = stamped["createdAt"].as_str().unwrap();
        assert!(crate::validate::parse_date(created).is_some());
    }

    #[test]
    fn reply_keeps_parent_on_the_wire() {
        let reply = CommentForm {
            content: "Agreed".into(),
            name: "Ada".into(),
            ..CommentForm::reply_to(Some("1".into()))
        };
        assert!(reply.validate().is_ok());
        let body = serde_json::to_value(&reply).unwrap();
        assert_eq!(body["parentId"], "1");

        let top = serde_json::to_value(CommentForm::reply_to(None)).unwrap();
        assert!(top["parentId"].is_null());
    }
}
