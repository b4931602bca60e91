use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for `webhook-dispatcher` (§4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Delay before each delivery attempt, in order. Attempt count is
    /// `retry_schedule.len()`.
    #[serde(with = "duration_secs_vec")]
    pub retry_schedule: Vec<Duration>,
    pub request_timeout_secs: u64,
    pub worker_pool_size: usize,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            retry_schedule: vec![
                Duration::from_secs(0),
                Duration::from_secs(30),
                Duration::from_secs(120),
                Duration::from_secs(600),
                Duration::from_secs(3600),
            ],
            request_timeout_secs: 10,
            worker_pool_size: 8,
        }
    }
}

/// Tunables for `form-validator`'s `file_upload` field type (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    pub max_file_size_bytes: u64,
    pub allowed_file_extensions: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            allowed_file_extensions: [
                "txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "xls", "xlsx", "ppt",
                "pptx", "csv",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Load a `Default`-backed settings struct, overridden by `{PREFIX}_*`
/// environment variables (double underscore for nested fields, matching
/// the `config` crate's `Environment::with_separator("__")` convention).
pub fn load<T>(env_prefix: &str) -> crate::error::Result<T>
where
    T: Default + Serialize + serde::de::DeserializeOwned,
{
    let defaults = config::Config::try_from(&T::default())?;
    let built = config::Config::builder()
        .add_source(defaults)
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    Ok(built.try_deserialize()?)
}

mod duration_secs_vec {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(durations: &[Duration], s: S) -> Result<S::Ok, S::Error> {
        let secs: Vec<u64> = durations.iter().map(Duration::as_secs).collect();
        secs.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Duration>, D::Error> {
        let secs = Vec::<u64>::deserialize(d)?;
        Ok(secs.into_iter().map(Duration::from_secs).collect())
    }
}
