use log::{info, warn};

use super::core::JenkinsProvider;
use crate::error::{JenkinsError, Result};
use crate::models::Job;
use crate::providers::jenkins::client::{read_json, require_success};
use crate::providers::jenkins::types::JobListDto;
use crate::providers::jenkins::url_utils;

const JOBS_TREE: &str = "jobs[name,url,color]";

impl JenkinsProvider {
    /// Lists every job in server order, unfiltered.
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let url = url_utils::endpoint(self.client.base_url(), ["api", "json"])?;

        let response = self
            .client
            .get(url, &[("tree", JOBS_TREE)])
            .await
            .and_then(require_success)
            .map_err(JenkinsError::request("list jobs"))?;
        let listing: JobListDto = read_json(response)
            .await
            .map_err(JenkinsError::request("list jobs"))?;

        if listing.jobs.is_empty() {
            warn!("Jenkins reported no jobs");
        } else {
            let building = listing.jobs.iter().filter(|j| j.is_building()).count();
            info!("Found {} jobs ({building} building)", listing.jobs.len());
        }

        Ok(listing.jobs)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::providers::jenkins::client::JenkinsClient;

    fn provider(server: &mockito::ServerGuard) -> JenkinsProvider {
        JenkinsProvider::new(JenkinsClient::new(&server.url(), None).unwrap())
    }

    #[tokio::test]
    async fn test_list_jobs_preserves_server_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/json")
            .match_query(Matcher::UrlEncoded("tree".into(), JOBS_TREE.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"_class":"hudson.model.Hudson","jobs":[
                    {"_class":"hudson.model.FreeStyleProject","name":"zeta","url":"http://j/job/zeta/","color":"blue"},
                    {"_class":"hudson.model.FreeStyleProject","name":"alpha","url":"http://j/job/alpha/","color":"red_anime"},
                    {"_class":"com.cloudbees.hudson.plugins.folder.Folder","name":"team","url":"http://j/job/team/"}
                ]}"#,
            )
            .create_async()
            .await;

        let jobs = provider(&server).list_jobs().await.unwrap();

        mock.assert_async().await;
        let names: Vec<&str> = jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "team"]);
        assert_eq!(jobs[0].url, "http://j/job/zeta/");
        assert_eq!(jobs[1].status_color, "red_anime");
        assert!(jobs[1].is_building());
        assert_eq!(jobs[2].status_color, "");
    }

    #[tokio::test]
    async fn test_list_jobs_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"jobs":[]}"#)
            .create_async()
            .await;

        let jobs = provider(&server).list_jobs().await.unwrap();

        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_list_jobs_wraps_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/json")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = provider(&server).list_jobs().await;

        assert!(matches!(
            result,
            Err(JenkinsError::RequestError {
                action: "list jobs",
                ..
            })
        ));
    }
}
