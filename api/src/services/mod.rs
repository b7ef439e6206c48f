//! The four RPC services, as methods on [`crate::ApiClient`].
//!
//! Request messages are public so front ends can build them field by field; response messages
//! are unwrapped into the entities they carry.

pub mod auth;
pub mod master;
pub mod mylist;
pub mod user;

pub use crate::client::Empty;
