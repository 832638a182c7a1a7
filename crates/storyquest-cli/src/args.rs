//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use storyquest_client::{ClientConfig, ConfigError};

use crate::app::LaunchOptions;

#[derive(Debug, Parser)]
#[command(
    name = "storyquest",
    about = "Learn any material through a five-chapter interactive story",
    version
)]
pub struct Args {
    /// Chapter service base URL (overrides STORYQUEST_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides STORYQUEST_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Study content to learn from
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// PDF to extract the study content from
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Interests to theme the story around
    #[arg(long)]
    pub interests: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "STORYQUEST_LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    /// Applies the flag overrides on top of `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `--base-url` is not an HTTP(S) URL.
    pub fn apply_to(&self, mut config: ClientConfig) -> Result<ClientConfig, ConfigError> {
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url)?;
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    #[must_use]
    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            text: self.text.clone(),
            file: self.file.clone(),
            interests: self.interests.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "storyquest",
            "--base-url",
            "http://quest.local:8080/",
            "--timeout-secs",
            "15",
        ])
        .unwrap();

        let config = args.apply_to(ClientConfig::default()).unwrap();

        assert_eq!(config.base_url, "http://quest.local:8080");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_without_flags_config_is_unchanged() {
        let args = Args::try_parse_from(["storyquest"]).unwrap();

        let config = args.apply_to(ClientConfig::default()).unwrap();

        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_text_and_file_are_mutually_exclusive() {
        let result =
            Args::try_parse_from(["storyquest", "--text", "notes", "--file", "notes.pdf"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_launch_options_carry_inputs() {
        let args = Args::try_parse_from([
            "storyquest",
            "--text",
            "Cell biology",
            "--interests",
            "cooking",
        ])
        .unwrap();

        let launch = args.launch_options();

        assert_eq!(launch.text.as_deref(), Some("Cell biology"));
        assert_eq!(launch.interests.as_deref(), Some("cooking"));
        assert!(launch.file.is_none());
    }
}
