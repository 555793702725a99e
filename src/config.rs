//! Configuration for classmate.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CLASSMATE_CLASSIFIER_CMD, CLASSMATE_MAX_RESULTS)
//! 2. Config file (.classmate/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .classmate/config.yaml

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::CommandClassifier;
use crate::mentions::{MentionRanker, MentionSettings, ScoringWeights};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".classmate";
const CONFIG_FILE: &str = "config.yaml";

pub const ENV_CLASSIFIER_CMD: &str = "CLASSMATE_CLASSIFIER_CMD";
pub const ENV_MAX_RESULTS: &str = "CLASSMATE_MAX_RESULTS";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub mentions: MentionSettings,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub classifier: Option<ClassifierConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Program to run for external subject classification
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved classifier command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifierSettings {
    pub command: String,
    pub args: Vec<String>,
    pub timeout_seconds: u64,
}

const DEFAULT_CLASSIFIER_TIMEOUT_SECONDS: u64 = 10;

/// Resolved configuration
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub mentions: MentionSettings,
    pub scoring: ScoringWeights,
    pub classifier: Option<ClassifierSettings>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            mentions: MentionSettings::default(),
            scoring: ScoringWeights::default(),
            classifier: None,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Build a ranker wired to the configured classifier command, if any
    pub fn mention_ranker(&self) -> MentionRanker {
        let ranker = MentionRanker::new(self.mentions.clone(), self.scoring.clone());
        match &self.classifier {
            Some(classifier) => ranker.with_classifier(Arc::new(CommandClassifier::new(
                classifier.command.clone(),
                classifier.args.clone(),
                Duration::from_secs(classifier.timeout_seconds),
            ))),
            None => ranker,
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve configuration starting the file search at `start`, reading
/// overrides through `env`
fn resolve_config<F>(start: &Path, env: F) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_file = find_config_file(start);

    let mut resolved = match &config_file {
        Some(path) => {
            let file = load_config_file(path)?;
            ResolvedConfig {
                mentions: file.mentions,
                scoring: file.scoring,
                classifier: file.classifier.map(|c| ClassifierSettings {
                    command: c.command,
                    args: c.args,
                    timeout_seconds: c
                        .timeout_seconds
                        .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT_SECONDS),
                }),
                config_file: config_file.clone(),
            }
        }
        None => ResolvedConfig::default(),
    };

    if let Some(command) = env(ENV_CLASSIFIER_CMD).filter(|c| !c.trim().is_empty()) {
        match resolved.classifier.as_mut() {
            Some(classifier) => classifier.command = command,
            None => {
                resolved.classifier = Some(ClassifierSettings {
                    command,
                    args: Vec::new(),
                    timeout_seconds: DEFAULT_CLASSIFIER_TIMEOUT_SECONDS,
                })
            }
        }
    }

    if let Some(raw) = env(ENV_MAX_RESULTS) {
        resolved.mentions.max_results = raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", ENV_MAX_RESULTS, raw))?;
    }

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    resolve_config(&cwd, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (bypasses the global cache)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = resolve_config(temp.path(), no_env).unwrap();
        assert!(config.config_file.is_none());
        assert_eq!(config.mentions.max_results, 6);
        assert_eq!(config.mentions.cache_ttl_seconds, 300);
        assert_eq!(config.scoring, ScoringWeights::default());
        assert!(config.classifier.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
version: "1.0"
mentions:
  max_results: 4
  use_external_classifier: true
scoring:
  expertise: 60
classifier:
  command: ./classify.sh
  args: ["--fast"]
"#,
        );

        let file = load_config_file(&path).unwrap();
        assert_eq!(file.version, "1.0");

        let config = resolve_config(temp.path(), no_env).unwrap();
        assert_eq!(config.config_file, Some(path));
        assert_eq!(config.mentions.max_results, 4);
        assert!(config.mentions.use_external_classifier);
        assert_eq!(config.mentions.min_classifier_chars, 15);
        assert_eq!(config.scoring.expertise, 60);
        assert_eq!(config.scoring.online, 20);

        let classifier = config.classifier.unwrap();
        assert_eq!(classifier.command, "./classify.sh");
        assert_eq!(classifier.args, vec!["--fast".to_string()]);
        assert_eq!(classifier.timeout_seconds, DEFAULT_CLASSIFIER_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_config_found_in_parent() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "version: \"1.0\"\n");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = resolve_config(&nested, no_env).unwrap();
        assert!(config.config_file.is_some());
    }

    #[test]
    fn test_env_overrides() {
        let temp = TempDir::new().unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_CLASSIFIER_CMD, "/usr/local/bin/subjects"),
            (ENV_MAX_RESULTS, " 3 "),
        ]
        .into_iter()
        .collect();

        let config =
            resolve_config(temp.path(), |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.mentions.max_results, 3);
        assert_eq!(
            config.classifier.map(|c| c.command),
            Some("/usr/local/bin/subjects".to_string())
        );
    }

    #[test]
    fn test_invalid_env_value() {
        let temp = TempDir::new().unwrap();
        let result = resolve_config(temp.path(), |key| {
            (key == ENV_MAX_RESULTS).then(|| "many".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "mentions: [not, a, map]");
        assert!(resolve_config(temp.path(), no_env).is_err());
    }
}
