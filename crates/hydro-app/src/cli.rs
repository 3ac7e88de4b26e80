//! CLI argument definitions for the HydroIntel terminal chat.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use hydro_core::config::{HydroConfig, StaleReplyPolicy};
use hydro_core::error::HydroError;

/// HydroIntel: a groundwater question-answering chat with scripted replies.
#[derive(Parser, Debug)]
#[command(name = "hydrointel", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Delay before the bot answers, in milliseconds.
    #[arg(long = "reply-delay-ms")]
    pub reply_delay_ms: Option<u64>,

    /// What to do with replies whose conversation was replaced: deliver or discard.
    #[arg(long = "stale-replies")]
    pub stale_replies: Option<String>,

    /// Enable voice input through the scripted recognizer.
    #[arg(long = "voice")]
    pub voice: bool,

    /// Transcript for the scripted recognizer (repeatable).
    #[arg(short = 't', long = "transcript")]
    pub transcripts: Vec<String>,

    /// Print frames without clearing the screen.
    #[arg(long = "plain")]
    pub plain: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HYDROINTEL_CONFIG env var > ~/.hydrointel/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HYDROINTEL_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter.
    ///
    /// Priority: --log-level flag > RUST_LOG env var > config file value.
    pub fn resolve_log_filter(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(filter) = std::env::var("RUST_LOG") {
            return filter;
        }
        config_level.to_string()
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut HydroConfig) -> Result<(), HydroError> {
        if let Some(delay) = self.reply_delay_ms {
            config.chat.reply_delay_ms = delay;
        }
        if let Some(ref policy) = self.stale_replies {
            config.chat.stale_replies = parse_stale_policy(policy)?;
        }
        if self.voice {
            config.speech.enabled = true;
        }
        if !self.transcripts.is_empty() {
            config.speech.transcripts = self.transcripts.clone();
        }
        Ok(())
    }
}

fn parse_stale_policy(value: &str) -> Result<StaleReplyPolicy, HydroError> {
    match value.to_ascii_lowercase().as_str() {
        "deliver" => Ok(StaleReplyPolicy::Deliver),
        "discard" => Ok(StaleReplyPolicy::Discard),
        other => Err(HydroError::Config(format!(
            "unknown stale reply policy '{}', expected deliver or discard",
            other
        ))),
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".hydrointel").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".hydrointel").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let mut argv = vec!["hydrointel"];
        argv.extend_from_slice(args);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = parse(&["--config", "/tmp/hydro.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/hydro.toml"));
    }

    #[test]
    fn test_log_flag_wins_over_config() {
        let args = parse(&["-l", "debug"]);
        assert_eq!(args.resolve_log_filter("info"), "debug");
    }

    #[test]
    fn test_apply_overrides() {
        let args = parse(&[
            "--reply-delay-ms",
            "10",
            "--stale-replies",
            "Discard",
            "--voice",
            "-t",
            "groundwater in Pune",
            "-t",
            "thanks",
        ]);
        let mut config = HydroConfig::default();
        args.apply(&mut config).unwrap();
        assert_eq!(config.chat.reply_delay_ms, 10);
        assert_eq!(config.chat.stale_replies, StaleReplyPolicy::Discard);
        assert!(config.speech.enabled);
        assert_eq!(config.speech.transcripts.len(), 2);
    }

    #[test]
    fn test_apply_without_flags_keeps_config() {
        let args = parse(&[]);
        let mut config = HydroConfig::default();
        config.speech.transcripts = vec!["kept".to_string()];
        args.apply(&mut config).unwrap();
        assert_eq!(config.chat.reply_delay_ms, 1500);
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.transcripts, vec!["kept".to_string()]);
    }

    #[test]
    fn test_bad_stale_policy_rejected() {
        let args = parse(&["--stale-replies", "redirect"]);
        let err = args.apply(&mut HydroConfig::default()).unwrap_err();
        assert!(err.to_string().contains("redirect"));
    }
}
