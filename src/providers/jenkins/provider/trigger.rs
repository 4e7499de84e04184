use std::future::Future;
use std::time::Duration;

use indexmap::IndexMap;
use log::{debug, info, warn};
use reqwest::header::LOCATION;
use tokio::time::{sleep, timeout_at, Instant};
use url::Url;

use super::core::JenkinsProvider;
use crate::error::{JenkinsError, Result};
use crate::models::TriggeredBuild;
use crate::providers::jenkins::client::{read_json, require_success};
use crate::providers::jenkins::types::{QueueItemDto, QueueState};
use crate::providers::jenkins::url_utils;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct TriggerOptions {
    /// Pause between two reads of the queue item.
    pub poll_interval: Duration,
    /// Upper bound on the whole trigger, submission and every poll included,
    /// even while a single request is stalled. `None` waits until Jenkins
    /// assigns or cancels the build.
    pub max_wait: Option<Duration>,
}

impl Default for TriggerOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
        }
    }
}

struct Deadline {
    started: Instant,
    at: Option<Instant>,
}

impl Deadline {
    fn new(max_wait: Option<Duration>) -> Self {
        let started = Instant::now();
        Self {
            started,
            at: max_wait.map(|max_wait| started + max_wait),
        }
    }

    /// Awaits `request`, failing with `TimeoutError` once the deadline passes.
    async fn guard<T>(&self, url: &Url, request: impl Future<Output = Result<T>>) -> Result<T> {
        match self.at {
            Some(at) => timeout_at(at, request)
                .await
                .map_err(|_| self.expired(url))?,
            None => request.await,
        }
    }

    fn expired(&self, url: &Url) -> JenkinsError {
        let waited = self.started.elapsed();
        warn!("Gave up on {url} after {waited:?}");
        JenkinsError::TimeoutError {
            url: url.to_string(),
            waited,
        }
    }
}

impl JenkinsProvider {
    /// Requests a build of `job_name` and waits for Jenkins to assign it a
    /// build number.
    ///
    /// Non-empty `parameters` select `buildWithParameters`; otherwise the
    /// plain `build` endpoint is used.
    pub async fn trigger(
        &self,
        job_name: &str,
        parameters: Option<&IndexMap<String, String>>,
        options: &TriggerOptions,
    ) -> Result<TriggeredBuild> {
        let deadline = Deadline::new(options.max_wait);
        let queue_url = self.submit(job_name, parameters, &deadline).await?;
        let (build_number, polls) = self
            .resolve_queue_item(&queue_url, options.poll_interval, &deadline)
            .await?;

        Ok(TriggeredBuild {
            job: job_name.to_string(),
            parameters: parameters.cloned().unwrap_or_default(),
            queue_url: queue_url.to_string(),
            build_number,
            polls,
        })
    }

    /// Posts the build request and returns the queue item's API address.
    async fn submit(
        &self,
        job_name: &str,
        parameters: Option<&IndexMap<String, String>>,
        deadline: &Deadline,
    ) -> Result<Url> {
        let parameters = parameters.filter(|p| !p.is_empty());
        let endpoint = if parameters.is_some() {
            "buildWithParameters"
        } else {
            "build"
        };
        let url = url_utils::job_endpoint(self.client.base_url(), job_name, &[endpoint])?;

        info!("Triggering {job_name} via {endpoint}");
        let response = deadline
            .guard(&url, async {
                self.client
                    .post(url.clone(), parameters)
                    .await
                    .and_then(require_success)
                    .map_err(JenkinsError::request("trigger job"))
            })
            .await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| JenkinsError::ProtocolError("No queue URL in response".to_string()))?;

        info!("Build of {job_name} queued at {location}");
        url_utils::queue_api_url(self.client.base_url(), location)
    }

    async fn fetch_queue_item(&self, queue_url: &Url) -> Result<QueueItemDto> {
        let response = self
            .client
            .get(queue_url.clone(), &[])
            .await
            .and_then(require_success)
            .map_err(JenkinsError::request("poll queue item"))?;

        read_json(response)
            .await
            .map_err(JenkinsError::request("poll queue item"))
    }

    /// Polls the queue item until it is assigned a build or cancelled.
    /// Returns the build number and the number of polls made.
    async fn resolve_queue_item(
        &self,
        queue_url: &Url,
        poll_interval: Duration,
        deadline: &Deadline,
    ) -> Result<(u64, usize)> {
        let mut polls = 0;

        loop {
            let item = deadline
                .guard(queue_url, self.fetch_queue_item(queue_url))
                .await?;
            polls += 1;

            let why = match QueueState::from(item) {
                QueueState::Resolved(number) => {
                    info!("Queue item resolved to build #{number} after {polls} polls");
                    return Ok((number, polls));
                }
                QueueState::Cancelled => {
                    warn!("Queue item {queue_url} was cancelled");
                    return Err(JenkinsError::CancelledError {
                        queue_url: queue_url.to_string(),
                    });
                }
                QueueState::Pending { why } => why,
            };
            debug!(
                "Queue item still pending: {}",
                why.as_deref().unwrap_or("no reason given")
            );

            let mut delay = poll_interval;
            if let Some(at) = deadline.at {
                let now = Instant::now();
                if now >= at {
                    return Err(deadline.expired(queue_url));
                }
                delay = delay.min(at - now);
            }
            sleep(delay).await;
        }
    }
}
