//! Session storage and login.
//!
//! The session is a single bearer token kept in a key-value store together
//! with the user id. There is no refresh, rotation or revocation; logging out
//! removes the keys.
//!
//! # Example
//!
//! ```ignore
//! use ridemap::session::{HttpLoginClient, LoginRequest, MemoryStore, SessionStore};
//!
//! let store = SessionStore::new(Arc::new(MemoryStore::new()));
//! let client = HttpLoginClient::new("http://localhost:3000/api")?;
//! let session = store
//!     .login(&client, LoginRequest::new("rider@example.com", "secret"))
//!     .await?;
//! ```

mod login;
mod store;

pub use login::{HttpLoginClient, LoginClient, LoginRequest, LoginResponse};
pub use store::{KeyValueStore, MemoryStore, Session, SessionStore, TOKEN_KEY, USER_ID_KEY};

use thiserror::Error;

/// Errors from session storage and login.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("Login rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode login response: {0}")]
    Decode(String),
}
