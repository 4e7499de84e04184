use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub url: String,
    #[serde(rename = "color", default)]
    pub status_color: String,
}

impl Job {
    /// Jenkins appends `_anime` to the color while a build is running.
    pub fn is_building(&self) -> bool {
        self.status_color.ends_with("_anime")
    }
}

/// Outcome of a build. `Running` is synthesised when Jenkins reports no
/// result yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
    Running,
    Other(String),
}

impl BuildStatus {
    pub fn from_result(result: Option<&str>) -> Self {
        match result {
            None => Self::Running,
            Some("SUCCESS") => Self::Success,
            Some("FAILURE") => Self::Failure,
            Some("UNSTABLE") => Self::Unstable,
            Some("ABORTED") => Self::Aborted,
            Some("NOT_BUILT") => Self::NotBuilt,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Unstable => "UNSTABLE",
            Self::Aborted => "ABORTED",
            Self::NotBuilt => "NOT_BUILT",
            Self::Running => "RUNNING",
            Self::Other(other) => other,
        };
        f.write_str(label)
    }
}

impl Serialize for BuildStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Build {
    pub number: u64,
    pub status: BuildStatus,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct JobStatus {
    pub job: String,
    pub build: Option<Build>,
}

#[derive(Debug, Serialize)]
pub struct TriggeredBuild {
    pub job: String,
    pub parameters: IndexMap<String, String>,
    pub queue_url: String,
    pub build_number: u64,
    pub polls: usize,
}
