/*
 * Responsibility
 * - the HTTP contract as data: every {verb, path} with its store operation and auth requirement
 * - build the Router by walking that table (no route exists that is not listed here)
 * - bearer auth is applied with route_layer to the protected half only, so it never
 *   runs for unmatched paths (static fallback) or the health marker
 */
use axum::{
    Router,
    routing::{MethodFilter, MethodRouter, on},
};

use crate::{
    api::handlers::{
        health::health,
        posts::{create_post, delete_post, get_post, list_posts, update_post},
    },
    middleware,
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
            Verb::Delete => MethodFilter::DELETE,
        }
    }
}

/// What a route does to the post store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Liveness marker; never touches the store.
    Health,
    List,
    Create,
    Read,
    Update,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    Public,
    Bearer,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub verb: Verb,
    pub path: &'static str,
    pub operation: Operation,
    pub auth: AuthRequirement,
}

const fn route(
    verb: Verb,
    path: &'static str,
    operation: Operation,
    auth: AuthRequirement,
) -> RouteSpec {
    RouteSpec {
        verb,
        path,
        operation,
        auth,
    }
}

pub const COLLECTION_PATH: &str = "/post";
pub const ITEM_PATH: &str = "/post/{id}";

pub const ROUTES: &[RouteSpec] = &[
    route(Verb::Get, "/", Operation::Health, AuthRequirement::Public),
    route(Verb::Get, COLLECTION_PATH, Operation::List, AuthRequirement::Bearer),
    route(Verb::Post, COLLECTION_PATH, Operation::Create, AuthRequirement::Bearer),
    route(Verb::Get, ITEM_PATH, Operation::Read, AuthRequirement::Bearer),
    route(Verb::Put, ITEM_PATH, Operation::Update, AuthRequirement::Bearer),
    route(Verb::Delete, ITEM_PATH, Operation::Remove, AuthRequirement::Bearer),
];

fn method_router(spec: &RouteSpec) -> MethodRouter<AppState> {
    let filter = spec.verb.filter();
    match spec.operation {
        Operation::Health => on(filter, health),
        Operation::List => on(filter, list_posts),
        Operation::Create => on(filter, create_post),
        Operation::Read => on(filter, get_post),
        Operation::Update => on(filter, update_post),
        Operation::Remove => on(filter, delete_post),
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    let (public, protected) = ROUTES.iter().fold(
        (Router::new(), Router::new()),
        |(public, protected), spec| match spec.auth {
            AuthRequirement::Public => (public.route(spec.path, method_router(spec)), protected),
            AuthRequirement::Bearer => (public, protected.route(spec.path, method_router(spec))),
        },
    );

    public.merge(middleware::auth::access::apply(protected, state))
}
