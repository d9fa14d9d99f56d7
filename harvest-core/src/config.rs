use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HarvestConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub har_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            har_path: "myactivity.google.com.har".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub records_json: String,
    pub sessions_json: String,
    pub markdown_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_json: "recovered_records.json".to_string(),
            sessions_json: "recovered_sessions.json".to_string(),
            markdown_dir: "sessions".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClusteringConfig {
    /// Inactivity gap (seconds) that separates two sessions.
    pub session_gap_seconds: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            session_gap_seconds: 7200,
        }
    }
}

impl HarvestConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        s.try_deserialize()
    }

    /// HAR path with `~` expanded, as a filesystem path.
    pub fn har_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.input.har_path).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarvestConfig::default();
        assert_eq!(config.clustering.session_gap_seconds, 7200);
        assert_eq!(config.output.markdown_dir, "sessions");
        assert_eq!(config.input.har_path, "myactivity.google.com.har");
    }

    #[test]
    fn test_tilde_expansion() {
        let config = HarvestConfig {
            input: InputConfig {
                har_path: "~/captures/activity.har".to_string(),
            },
            ..Default::default()
        };
        let path = config.har_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.to_string_lossy().ends_with("captures/activity.har"));
    }
}
