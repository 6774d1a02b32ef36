// postboard-api: Async Rust client for the posts and users collections

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{Post, User};
pub use transport::{TlsMode, TransportConfig};
