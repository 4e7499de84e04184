use indexmap::IndexMap;
use log::{debug, info};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::url_utils;
use crate::auth::Credentials;
use crate::error::{JenkinsError, Result, TransportError};

/// Authenticated HTTP access to one Jenkins instance.
///
/// Built once and never reconfigured; every reader shares it by reference.
pub struct JenkinsClient {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl JenkinsClient {
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jenkins-lens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JenkinsError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        let base_url = url_utils::parse_base_url(base_url)?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Creates the client and checks that `/api/json` answers successfully.
    pub async fn connect(base_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        let client = Self::new(base_url, credentials)?;
        let url = url_utils::endpoint(&client.base_url, ["api", "json"])?;

        info!(
            "Connecting to Jenkins at {} ({})",
            client.base_url,
            if client.is_authenticated() {
                "authenticated"
            } else {
                "anonymous"
            }
        );
        client
            .get(url, &[])
            .await
            .and_then(require_success)
            .map_err(JenkinsError::ConnectionError)?;

        Ok(client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub async fn get(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> std::result::Result<Response, TransportError> {
        debug!("GET {url}");
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send(request).await
    }

    pub async fn post(
        &self,
        url: Url,
        form: Option<&IndexMap<String, String>>,
    ) -> std::result::Result<Response, TransportError> {
        debug!("POST {url}");
        let mut request = self.client.post(url);
        if let Some(form) = form {
            request = request.form(form);
        }
        self.send(request).await
    }

    /// 404 is handed back as a normal response; callers decide what it means.
    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, TransportError> {
        let request = match &self.credentials {
            Some(credentials) => credentials.apply(request),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(response)
        } else {
            Err(TransportError::StatusError {
                url: response.url().to_string(),
                status,
            })
        }
    }
}

/// For endpoints where "not found" is not meaningful data.
pub fn require_success(response: Response) -> std::result::Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::StatusError {
            url: response.url().to_string(),
            status,
        })
    }
}

pub async fn read_json<T: DeserializeOwned>(
    response: Response,
) -> std::result::Result<T, TransportError> {
    Ok(response.json::<T>().await?)
}
