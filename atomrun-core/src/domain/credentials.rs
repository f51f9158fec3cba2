//! Connection credentials

use std::fmt;

/// Where the control-plane API lives and how to authenticate against it
///
/// Read once before any request and never modified afterwards.
#[derive(Clone)]
pub struct Credentials {
    /// Scheme and host, e.g. `https://api.example.com`
    pub base_url: String,
    /// Path prepended to every endpoint, e.g. `/api/rest/v1/account-123`
    pub path_prefix: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        base_url: impl Into<String>,
        path_prefix: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        let path_prefix = path_prefix.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            path_prefix: path_prefix.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Absolute URL for an endpoint relative to the path prefix
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, self.path_prefix, endpoint)
    }
}

// Never print the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("path_prefix", &self.path_prefix)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}
