/*
 * Responsibility
 * - request/response DTOs for /post
 * - wire names are camelCase (createdAt / updatedAt)
 * - unknown request fields are ignored: clients send the whole post back, id and timestamps included
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::{NewPost, PostChanges, PostRow};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            body: req.body,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            body: req.body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_request_ignores_client_side_fields() {
        let req: CreatePostRequest = serde_json::from_value(json!({
            "title": "Hello",
            "body": "World",
            "id": null,
            "createdAt": "2024-01-01T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(req.title, "Hello");
        assert_eq!(req.body, "World");
    }

    #[test]
    fn create_request_requires_a_title_but_not_a_body() {
        assert!(serde_json::from_value::<CreatePostRequest>(json!({ "body": "x" })).is_err());

        let req: CreatePostRequest = serde_json::from_value(json!({ "title": "only" })).unwrap();
        assert_eq!(req.body, "");
    }

    #[test]
    fn update_request_treats_null_as_unchanged() {
        let req: UpdatePostRequest =
            serde_json::from_value(json!({ "title": null, "body": "new" })).unwrap();
        let changes = PostChanges::from(req);

        assert_eq!(changes.title, None);
        assert_eq!(changes.body.as_deref(), Some("new"));
    }

    #[test]
    fn response_uses_camel_case_timestamps() {
        let row = PostRow {
            id: 3,
            title: "t".into(),
            body: "b".into(),
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            updated_at: None,
        };

        let value = serde_json::to_value(PostResponse::from(row)).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["createdAt"], "2024-01-01T00:00:00Z");
        assert!(value["updatedAt"].is_null());
    }
}
