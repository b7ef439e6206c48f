//! Client for the sekai-mylist API.
//!
//! The server speaks the Connect protocol (unary calls over HTTP/1.1 with JSON bodies) and exposes
//! four services: master data, auth, user accounts and mylists. It also serves plain HTTP endpoints
//! for uploading and deleting files.
//!
//! [`ApiClient`] is the entry point. It is generic over a [`Transport`] so that tests can swap the
//! network out; [`HttpTransport`] is the real thing.

pub mod client;
pub mod errors;
pub mod services;
pub mod session;
pub mod transport;
pub mod upload;

pub use client::{Access, ApiClient, AuthFailureHook};
pub use errors::{ApiError, Code};
pub use session::{MemoryTokenStore, SessionError, TokenStore};
pub use transport::{DeleteFileRequest, HttpTransport, Procedure, RpcRequest, Transport, UploadRequest};
pub use upload::{FilePart, UploadKind};
