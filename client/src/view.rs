//! What the list view shows, derived from the in-memory collection.
//!
//! Ordering is a view concern only: the controller keeps posts in whatever
//! order the server returned them.
use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::Post;

pub const EMPTY_MESSAGE: &str = "No posts to display";

/// Most recently updated first; never-updated posts after all updated ones;
/// title ascending as the tie-break.
pub fn display_cmp(a: &Post, b: &Post) -> Ordering {
    // Option orders None below Some, so reversing puts absent stamps last.
    b.updated_at
        .cmp(&a.updated_at)
        .then_with(|| a.title.cmp(&b.title))
}

/// Stable sort by [`display_cmp`]; applying it to its own output is a no-op.
pub fn display_order(posts: &[Post]) -> Vec<&Post> {
    let mut ordered: Vec<&Post> = posts.iter().collect();
    ordered.sort_by(|a, b| display_cmp(a, b));
    ordered
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: Option<i64>,
    pub title: String,
    pub link: String,
    /// "Updated 5 minutes ago"; absent for posts never updated.
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// First load still in flight; render nothing.
    Loading,
    Empty,
    Rows(Vec<ListRow>),
}

pub fn list_view(loading: bool, posts: &[Post], now: DateTime<Utc>) -> ListView {
    if posts.is_empty() {
        return if loading {
            ListView::Loading
        } else {
            ListView::Empty
        };
    }

    ListView::Rows(
        display_order(posts)
            .into_iter()
            .map(|post| ListRow {
                id: post.id,
                title: post.title.clone(),
                link: match post.id {
                    Some(id) => format!("/posts/{id}"),
                    None => "/posts/new".to_string(),
                },
                updated: post
                    .updated_at
                    .map(|at| format!("Updated {}", from_now(at, now))),
            })
            .collect(),
    )
}

/// Relative wording for a past instant ("a few seconds ago", "3 days ago").
///
/// Thresholds follow the usual humanized-duration buckets; each count is
/// rounded to the nearest unit. Instants in the future read as "a few seconds ago".
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0) as f64;
    let minutes = (seconds / 60.0).round();
    let hours = (minutes / 60.0).round();
    let days = (hours / 24.0).round();

    let phrase = if seconds < 45.0 {
        "a few seconds".to_string()
    } else if seconds < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if days < 45.0 {
        "a month".to_string()
    } else if days < 320.0 {
        format!("{} months", (days / 30.0).round())
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        format!("{} years", (days / 365.0).round())
    };

    format!("{phrase} ago")
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn post(id: i64, title: &str, updated_secs: Option<i64>) -> Post {
        let base: DateTime<Utc> = "2024-05-01T00:00:00Z".parse().unwrap();
        Post {
            id: Some(id),
            title: title.into(),
            body: String::new(),
            created_at: Some(base),
            updated_at: updated_secs.map(|s| base + Duration::seconds(s)),
        }
    }

    fn ids(posts: &[&Post]) -> Vec<i64> {
        posts.iter().filter_map(|p| p.id).collect()
    }

    #[test]
    fn newest_update_first_then_title() {
        let posts = vec![
            post(1, "b", Some(10)),
            post(2, "a", Some(30)),
            post(3, "c", Some(10)),
            post(4, "a", Some(10)),
        ];

        assert_eq!(ids(&display_order(&posts)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn never_updated_posts_sort_last_regardless_of_title() {
        let posts = vec![
            post(1, "aaa", None),
            post(2, "zzz", Some(1)),
            post(3, "mmm", None),
        ];

        assert_eq!(ids(&display_order(&posts)), vec![2, 1, 3]);
    }

    #[test]
    fn ordering_is_idempotent() {
        let posts = vec![
            post(1, "x", None),
            post(2, "x", None),
            post(3, "b", Some(5)),
            post(4, "a", Some(5)),
            post(5, "c", Some(50)),
        ];

        let once: Vec<Post> = display_order(&posts).into_iter().cloned().collect();
        let twice: Vec<Post> = display_order(&once).into_iter().cloned().collect();
        assert_eq!(once, twice);
        // equal keys keep their incoming order
        assert_eq!(ids(&display_order(&posts))[3..], [1, 2]);
    }

    #[test]
    fn list_view_states() {
        let now = Utc::now();
        assert_eq!(list_view(true, &[], now), ListView::Loading);
        assert_eq!(list_view(false, &[], now), ListView::Empty);

        let updated = Post {
            updated_at: Some(now - Duration::minutes(5)),
            ..post(7, "seven", None)
        };
        let ListView::Rows(rows) = list_view(false, &[post(8, "eight", None), updated], now) else {
            panic!("expected rows");
        };

        assert_eq!(rows[0].id, Some(7));
        assert_eq!(rows[0].link, "/posts/7");
        assert_eq!(rows[0].updated.as_deref(), Some("Updated 5 minutes ago"));
        assert_eq!(rows[1].updated, None);
    }

    #[test]
    fn relative_wording_buckets() {
        let now = Utc::now();
        let ago = |d: Duration| from_now(now - d, now);

        assert_eq!(ago(Duration::seconds(10)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(60)), "a minute ago");
        assert_eq!(ago(Duration::minutes(12)), "12 minutes ago");
        assert_eq!(ago(Duration::minutes(60)), "an hour ago");
        assert_eq!(ago(Duration::hours(5)), "5 hours ago");
        assert_eq!(ago(Duration::hours(30)), "a day ago");
        assert_eq!(ago(Duration::days(3)), "3 days ago");
        assert_eq!(ago(Duration::days(40)), "a month ago");
        assert_eq!(ago(Duration::days(90)), "3 months ago");
        assert_eq!(ago(Duration::days(400)), "a year ago");
        assert_eq!(ago(Duration::days(1000)), "3 years ago");
        assert_eq!(from_now(now + Duration::hours(1), now), "a few seconds ago");
    }
}
