/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the verified caller (put into request extensions by the access middleware) to handlers
 */

mod core;

pub use self::core::AuthCtx;
