// Collection HTTP client
//
// Wraps `reqwest::Client` with the two collection endpoints. Each call is a
// single GET returning a bare JSON array; non-success statuses and bodies
// that fail to decode are surfaced as distinct errors.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Post, User};
use crate::transport::TransportConfig;

/// Raw HTTP client for the posts and users collections.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    posts_url: Url,
    users_url: Url,
}

impl ApiClient {
    /// Create a client with its own `reqwest::Client` built from `transport`.
    pub fn new(posts_url: Url, users_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            posts_url,
            users_url,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, posts_url: Url, users_url: Url) -> Self {
        Self {
            http,
            posts_url,
            users_url,
        }
    }

    /// Create a client for an API root that serves `{base}/posts` and
    /// `{base}/users`.
    pub fn from_base_url(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let mut base: Url = base_url.parse()?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            posts_url: base.join("posts")?,
            users_url: base.join("users")?,
        })
    }

    pub fn posts_url(&self) -> &Url {
        &self.posts_url
    }

    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET {posts_url}`
    pub async fn list_posts(&self) -> Result<Vec<Post>, Error> {
        let posts: Vec<Post> = self.get_json(self.posts_url.clone()).await?;
        debug!(count = posts.len(), "fetched posts");
        Ok(posts)
    }

    /// `GET {users_url}`
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        let users: Vec<User> = self.get_json(self.users_url.clone()).await?;
        debug!(count = users.len(), "fetched users");
        Ok(users)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url.clone()).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_base_url_appends_collection_paths() {
        let client =
            ApiClient::from_base_url("http://127.0.0.1:9000", reqwest::Client::new()).unwrap();
        assert_eq!(client.posts_url().as_str(), "http://127.0.0.1:9000/posts");
        assert_eq!(client.users_url().as_str(), "http://127.0.0.1:9000/users");
    }

    #[test]
    fn from_base_url_keeps_nested_prefix() {
        let client =
            ApiClient::from_base_url("https://example.com/api/v1", reqwest::Client::new())
                .unwrap();
        assert_eq!(client.posts_url().as_str(), "https://example.com/api/v1/posts");
        assert_eq!(client.users_url().as_str(), "https://example.com/api/v1/users");
    }

    #[test]
    fn from_base_url_rejects_garbage() {
        let err = ApiClient::from_base_url("not a url", reqwest::Client::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
