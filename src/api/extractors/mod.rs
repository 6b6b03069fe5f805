pub mod auth_ctx;
pub mod json;
pub mod post_id;

pub use auth_ctx::AuthCtx;
pub use json::Json;
pub use post_id::PostId;
