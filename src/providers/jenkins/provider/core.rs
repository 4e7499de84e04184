use crate::auth::Credentials;
use crate::error::Result;
use crate::providers::jenkins::client::JenkinsClient;

pub struct JenkinsProvider {
    pub client: JenkinsClient,
}

impl JenkinsProvider {
    pub fn new(client: JenkinsClient) -> Self {
        Self { client }
    }

    pub async fn connect(base_url: &str, credentials: Option<Credentials>) -> Result<Self> {
        let client = JenkinsClient::connect(base_url, credentials).await?;

        Ok(Self::new(client))
    }
}
