mod token;

pub use token::Token;

use crate::error::{JenkinsError, Result};

/// Username + API token pair sent as HTTP basic credentials on every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub token: Token,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<Token>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Builds credentials from optional CLI/env values.
    ///
    /// Both absent means anonymous access. Supplying only one half is
    /// rejected rather than silently falling back to anonymous.
    pub fn from_parts(username: Option<&str>, token: Option<&str>) -> Result<Option<Self>> {
        let username = username.map(str::trim).filter(|u| !u.is_empty());
        let token = token.map(Token::from).filter(|t| !t.is_empty());

        match (username, token) {
            (Some(username), Some(token)) => Ok(Some(Self::new(username, token))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(JenkinsError::ConfigError(
                "an API token is required when a username is given".to_string(),
            )),
            (None, Some(_)) => Err(JenkinsError::ConfigError(
                "a username is required when an API token is given".to_string(),
            )),
        }
    }

    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.username, Some(self.token.as_str()))
    }
}
