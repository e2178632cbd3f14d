//! The users feature: record types, form validation, the `/api/user` endpoint
//! client and the store that keeps a cached list in sync with the server.

pub mod client;
pub mod store;
pub mod types;
pub mod validate;

pub use self::{
    store::{State, Store},
    types::{Age, DialogMode, Draft, User},
    validate::{validate_age, validate_form, validate_name, Field, ValidationError},
};
