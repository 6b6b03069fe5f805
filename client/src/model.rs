use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post as the client holds it.
///
/// `id == None` marks a draft that only exists in the editor. `title` and
/// `body` are required on the wire so that an error envelope never decodes
/// as a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn draft(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn draft_serializes_without_id_or_timestamps() {
        let value = serde_json::to_value(Post::draft("T", "B")).unwrap();
        assert_eq!(value, json!({ "title": "T", "body": "B" }));
    }

    #[test]
    fn server_post_decodes_with_null_updated_at() {
        let post: Post = serde_json::from_value(json!({
            "id": 4,
            "title": "T",
            "body": "B",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": null,
        }))
        .unwrap();

        assert_eq!(post.id, Some(4));
        assert!(!post.is_draft());
        assert_eq!(post.updated_at, None);
    }

    #[test]
    fn error_envelope_is_not_a_post() {
        let envelope = json!({ "error": { "code": "NOT_FOUND", "message": "post not found." } });
        assert!(serde_json::from_value::<Post>(envelope).is_err());
    }
}
