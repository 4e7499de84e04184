use futures::{stream, StreamExt, TryStreamExt};
use log::info;
use reqwest::StatusCode;

use super::core::JenkinsProvider;
use crate::error::{JenkinsError, Result};
use crate::models::{Build, JobStatus};
use crate::providers::jenkins::client::read_json;
use crate::providers::jenkins::types::BuildDto;
use crate::providers::jenkins::url_utils;

const BUILD_TREE: &str = "number,result,timestamp,duration,url";
const CONCURRENCY: usize = 8;

impl JenkinsProvider {
    /// Latest build of `job_name`, or `None` when the job has no builds (or
    /// does not exist).
    pub async fn latest_build(&self, job_name: &str) -> Result<Option<Build>> {
        let url = url_utils::job_endpoint(
            self.client.base_url(),
            job_name,
            &["lastBuild", "api", "json"],
        )?;

        let response = self
            .client
            .get(url, &[("tree", BUILD_TREE)])
            .await
            .map_err(JenkinsError::request("get job status"))?;

        if response.status() == StatusCode::NOT_FOUND {
            info!("No builds found for {job_name}");
            return Ok(None);
        }

        let dto: BuildDto = read_json(response)
            .await
            .map_err(JenkinsError::request("get job status"))?;
        let build = Build::try_from(dto)?;
        info!("Latest build for {job_name}: #{} {}", build.number, build.status);

        Ok(Some(build))
    }

    /// Reads several jobs concurrently; results keep the order of `job_names`.
    pub async fn latest_builds(&self, job_names: &[String]) -> Result<Vec<JobStatus>> {
        stream::iter(job_names)
            .map(|name| async move {
                let build = self.latest_build(name).await?;
                Ok::<_, JenkinsError>(JobStatus {
                    job: name.clone(),
                    build,
                })
            })
            .buffered(CONCURRENCY)
            .try_collect()
            .await
    }
}
