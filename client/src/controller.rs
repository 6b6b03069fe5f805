/*
 * Responsibility
 * - hold the list state (loading flag + the collection mirrored from the server)
 * - route between the list and the editor (/posts, /posts/new, /posts/{id})
 * - save / delete, then rebuild the collection from the server (full refresh, no local merge)
 *
 * Every operation takes &mut self and awaits its round trips in order, so one
 * controller never has two calls in flight.
 */
use chrono::{DateTime, Utc};

use crate::{
    gateway::{Fetch, FetchFailure, PostsApi},
    model::Post,
    view::{self, ListView},
};

pub const LIST_PATH: &str = "/posts";
pub const NEW_SEGMENT: &str = "new";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    New,
    /// Raw `{id}` segment; resolved against the collection when the editor renders.
    Edit(String),
}

impl Route {
    /// `/posts` → List, `/posts/new` → New, `/posts/{id}` → Edit. Anything else is not a route.
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.trim_end_matches('/').strip_prefix(LIST_PATH)?;
        if rest.is_empty() {
            return Some(Route::List);
        }

        let segment = rest.strip_prefix('/')?;
        if segment.is_empty() || segment.contains('/') {
            return None;
        }

        Some(if segment == NEW_SEGMENT {
            Route::New
        } else {
            Route::Edit(segment.to_string())
        })
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => LIST_PATH.to_string(),
            Route::New => format!("{LIST_PATH}/{NEW_SEGMENT}"),
            Route::Edit(segment) => format!("{LIST_PATH}/{segment}"),
        }
    }
}

/// What the editor sub-view is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Editor {
    Draft(Post),
    Existing(Post),
}

impl Editor {
    pub fn into_post(self) -> Post {
        match self {
            Editor::Draft(post) | Editor::Existing(post) => post,
        }
    }
}

/// Synchronous yes/no gate in front of deletion.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

pub fn delete_prompt(post: &Post) -> String {
    format!("Are you sure you want to delete \"{}\"", post.title)
}

pub struct PostsManager<A> {
    api: A,
    loading: bool,
    posts: Vec<Post>,
    current: Route,
    back: Vec<Route>,
    last_failure: Option<FetchFailure>,
}

impl<A: PostsApi> PostsManager<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            loading: true,
            posts: Vec::new(),
            current: Route::List,
            back: Vec::new(),
            last_failure: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The collection in server order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn route(&self) -> &Route {
        &self.current
    }

    /// Why the latest load came back empty-handed, if it did.
    ///
    /// Diagnostics only: rendering does not distinguish a failed load from an
    /// empty collection.
    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    /// Fetch the whole collection and replace local state with it.
    ///
    /// A failed fetch degrades to an empty collection, so the list renders
    /// exactly as it would for a server with no posts.
    pub async fn load(&mut self) {
        match self.api.list_posts().await {
            Fetch::Success(posts) => {
                self.posts = posts;
                self.last_failure = None;
            }
            Fetch::Failure(failure) => {
                self.posts.clear();
                self.last_failure = Some(failure);
            }
        }
        self.loading = false;
    }

    pub fn display_order(&self) -> Vec<&Post> {
        view::display_order(&self.posts)
    }

    pub fn list_view(&self, now: DateTime<Utc>) -> ListView {
        view::list_view(self.loading, &self.posts, now)
    }

    pub fn navigate(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.current, route);
        self.back.push(previous);
    }

    /// Navigate by path; unknown paths land on the list.
    pub fn navigate_to(&mut self, path: &str) {
        self.navigate(Route::parse(path).unwrap_or(Route::List));
    }

    pub fn go_back(&mut self) {
        self.current = self.back.pop().unwrap_or(Route::List);
    }

    /// Resolve the current route to an editor.
    ///
    /// `None` while loading and on the list. An id that is not in the
    /// collection (stale link, deleted post, not a number) redirects to the
    /// list, replacing the current history entry.
    pub fn editor(&mut self) -> Option<Editor> {
        if self.loading {
            return None;
        }

        let segment = match &self.current {
            Route::List => return None,
            Route::New => return Some(Editor::Draft(Post::default())),
            Route::Edit(segment) => segment,
        };

        let found = segment
            .parse::<i64>()
            .ok()
            .and_then(|id| self.posts.iter().find(|post| post.id == Some(id)))
            .cloned();

        match found {
            Some(post) => Some(Editor::Existing(post)),
            None => {
                tracing::debug!(segment = %segment, "no such post; redirecting to list");
                self.current = Route::List;
                None
            }
        }
    }

    /// Create a draft or update an existing post, go back, then reload.
    ///
    /// Success and failure take the same path; the reload is what the view shows.
    pub async fn save(&mut self, post: Post) {
        let outcome = match post.id {
            Some(id) => self.api.update_post(id, &post).await.map(|_| ()),
            None => self.api.create_post(&post).await.map(|_| ()),
        };
        if let Fetch::Failure(failure) = &outcome {
            tracing::debug!(error = %failure, "save did not succeed; reloading anyway");
        }

        self.go_back();
        self.load().await;
    }

    /// Ask `confirm`; on yes delete and reload. Returns whether the user confirmed.
    pub async fn delete<C>(&mut self, post: &Post, confirm: &mut C) -> bool
    where
        C: Confirm + ?Sized,
    {
        if !confirm.confirm(&delete_prompt(post)) {
            return false;
        }

        match post.id {
            Some(id) => {
                if let Fetch::Failure(failure) = self.api.delete_post(id).await {
                    tracing::debug!(error = %failure, "delete did not succeed; reloading anyway");
                }
            }
            None => tracing::debug!("draft has nothing to delete on the server"),
        }

        self.load().await;
        true
    }
}
