//! # Roster (user table client)
//!
//! `roster` manages a table of users (name, age) held by a remote REST
//! resource at `/api/user`.
//!
//! ## Layers
//!
//! - [`api`] wraps `reqwest` with a fixed base URL, JSON content type, timeouts
//!   and consistent error mapping.
//! - [`users`] holds the record types, field validation, the endpoint client
//!   and the [`users::store::Store`] that keeps a draft, a cached list and the
//!   current dialog mode in sync with the server.
//! - [`cli`] exposes the store as `roster list|add|update|delete`.
//!
//! Every mutation is followed by a full reload of the list from the server
//! (reconcile); the cache is never patched locally.

pub mod api;
pub mod cli;
pub mod users;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
