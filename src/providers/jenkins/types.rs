use chrono::DateTime;
use serde::Deserialize;

use crate::error::{JenkinsError, Result};
use crate::models::{Build, BuildStatus, Job};

#[derive(Debug, Deserialize)]
pub struct JobListDto {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
pub struct BuildDto {
    pub number: u64,
    pub result: Option<String>,
    pub timestamp: i64,
    pub duration: u64,
    pub url: String,
}

impl TryFrom<BuildDto> for Build {
    type Error = JenkinsError;

    fn try_from(dto: BuildDto) -> Result<Self> {
        let timestamp = DateTime::from_timestamp_millis(dto.timestamp).ok_or_else(|| {
            JenkinsError::ProtocolError(format!(
                "Build #{} has an out-of-range timestamp: {}",
                dto.number, dto.timestamp
            ))
        })?;

        Ok(Self {
            number: dto.number,
            status: BuildStatus::from_result(dto.result.as_deref()),
            timestamp,
            duration_ms: dto.duration,
            url: dto.url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ExecutableDto {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub struct QueueItemDto {
    #[serde(default)]
    pub cancelled: bool,
    pub executable: Option<ExecutableDto>,
    pub why: Option<String>,
}

/// What a single poll of a queue item says about the requested build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueState {
    /// Waiting for an executor or a quiet period; `why` is Jenkins' reason.
    Pending { why: Option<String> },
    Resolved(u64),
    Cancelled,
}

impl From<QueueItemDto> for QueueState {
    fn from(dto: QueueItemDto) -> Self {
        match dto.executable {
            Some(executable) => Self::Resolved(executable.number),
            None if dto.cancelled => Self::Cancelled,
            None => Self::Pending { why: dto.why },
        }
    }
}
