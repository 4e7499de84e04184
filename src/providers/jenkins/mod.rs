mod client;
mod provider;
mod types;
mod url_utils;

pub use provider::{JenkinsProvider, TriggerOptions};
