mod core;
mod jobs;
mod status;
mod trigger;

pub use self::core::JenkinsProvider;
pub use trigger::TriggerOptions;
