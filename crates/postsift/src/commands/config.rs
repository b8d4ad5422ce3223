//! Config command implementation.
//!
//! View configuration settings.
//! Config file is located at ~/.config/postsift/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use postsift_query::{SelectorOptions, DEFAULT_CHUNK_LEN, DEFAULT_CPU_DIVIDE_COUNT};
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "POSTSIFT_CONFIG";

/// Default number of rotated result backups.
pub const DEFAULT_BACKUP_COUNT: usize = 5;

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory settings.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Run settings.
    #[serde(default)]
    pub run: RunConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            paths: PathsConfig::default(),
            run: RunConfig::default(),
        }
    }
}

/// Directory configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `<name>.txt` query files.
    pub query_dir: PathBuf,
    /// Directory whose first file is the default input.
    pub input_dir: PathBuf,
    /// Directory receiving result files.
    pub results_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            query_dir: PathBuf::from("queries"),
            input_dir: PathBuf::from("run"),
            results_dir: PathBuf::from("results"),
        }
    }
}

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// The CPU count is divided by this to size the worker pool.
    pub cpu_divide_count: usize,
    /// Fixed worker count, overriding the CPU-derived one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    /// Records per chunk for large inputs.
    pub chunk_len: usize,
    /// Number of rotated result backups to keep.
    pub backup_count: usize,
    /// Keep the text column in result files.
    pub keep_text: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cpu_divide_count: DEFAULT_CPU_DIVIDE_COUNT,
            workers: None,
            chunk_len: DEFAULT_CHUNK_LEN,
            backup_count: DEFAULT_BACKUP_COUNT,
            keep_text: false,
        }
    }
}

impl RunConfig {
    /// Returns selector options, with `workers` overriding the configured count.
    pub fn selector_options(&self, workers: Option<usize>) -> SelectorOptions {
        SelectorOptions {
            workers: workers.or(self.workers),
            cpu_divide_count: self.cpu_divide_count,
            chunk_len: self.chunk_len,
        }
    }
}

/// Gets the config file path.
///
/// Resolution order: `$POSTSIFT_CONFIG`, `$XDG_CONFIG_HOME/postsift/config.toml`,
/// then `~/.config/postsift/config.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("postsift").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("postsift").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk. A missing file yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {e}")))?;

    parse_config(&content)
}

/// Parses config file contents and migrates them to the current version.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {e}")))?;

    validate_config(&config)?;
    migrate_config(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.run.cpu_divide_count == 0 {
        return Err(CommandError::Config(
            "run.cpu_divide_count must be at least 1".to_string(),
        ));
    }
    if config.run.chunk_len == 0 {
        return Err(CommandError::Config("run.chunk_len must be at least 1".to_string()));
    }
    if config.run.workers == Some(0) {
        return Err(CommandError::Config("run.workers must be at least 1".to_string()));
    }
    Ok(())
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema. Later versions upgrade here in order.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{header}\n");
        }

        println!("File: {}", path.display());
        if !path.exists() {
            println!("(No config file exists. Showing defaults.)");
        }

        println!("\n[paths]");
        println!("  query_dir: {}", config.paths.query_dir.display());
        println!("  input_dir: {}", config.paths.input_dir.display());
        println!("  results_dir: {}", config.paths.results_dir.display());

        println!("\n[run]");
        println!("  cpu_divide_count: {}", config.run.cpu_divide_count);
        match config.run.workers {
            Some(workers) => println!("  workers: {workers}"),
            None => println!("  workers: auto ({})", config.run.selector_options(None).worker_count()),
        }
        println!("  chunk_len: {}", config.run.chunk_len);
        println!("  backup_count: {}", config.run.backup_count);
        println!("  keep_text: {}", config.run.keep_text);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;

    /// Runs `f` with `POSTSIFT_CONFIG` pointing at `path`, restoring it after.
    fn with_config_env<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var(CONFIG_ENV).ok();
        env::set_var(CONFIG_ENV, path);
        let result = f();
        match original {
            Some(val) => env::set_var(CONFIG_ENV, val),
            None => env::remove_var(CONFIG_ENV),
        }
        result
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.paths.query_dir, PathBuf::from("queries"));
        assert_eq!(config.run.cpu_divide_count, 2);
        assert_eq!(config.run.chunk_len, 100);
        assert_eq!(config.run.backup_count, 5);
        assert!(config.run.workers.is_none());
        assert!(!config.run.keep_text);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[paths]
query_dir = "/data/queries"
results_dir = "/data/out"

[run]
workers = 8
backup_count = 2
keep_text = true
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.paths.query_dir, PathBuf::from("/data/queries"));
        assert_eq!(config.paths.input_dir, PathBuf::from("run"));
        assert_eq!(config.paths.results_dir, PathBuf::from("/data/out"));
        assert_eq!(config.run.workers, Some(8));
        assert_eq!(config.run.backup_count, 2);
        assert_eq!(config.run.chunk_len, DEFAULT_CHUNK_LEN);
        assert!(config.run.keep_text);
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_rejects_zero_values() {
        assert!(parse_config("[run]\ncpu_divide_count = 0").is_err());
        assert!(parse_config("[run]\nchunk_len = 0").is_err());
        assert!(parse_config("[run]\nworkers = 0").is_err());
    }

    #[test]
    fn test_config_rejects_malformed_toml() {
        let err = parse_config("[run\nworkers = 2").unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let mut config = Config::default();
        config.run.workers = Some(3);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[paths]"));
        assert!(toml_str.contains("[run]"));
        assert_eq!(parse_config(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_migrate_config_sets_current_version() {
        let config = Config {
            version: 0,
            ..Config::default()
        };
        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
    }

    #[test]
    fn test_selector_options_flag_overrides_config() {
        let run = RunConfig {
            workers: Some(6),
            chunk_len: 50,
            ..RunConfig::default()
        };
        assert_eq!(run.selector_options(None).workers, Some(6));
        assert_eq!(run.selector_options(Some(2)).workers, Some(2));
        assert_eq!(run.selector_options(None).chunk_len, 50);
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        let path = PathBuf::from("/tmp/postsift-test/config.toml");
        let resolved = with_config_env(&path, get_config_path).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    #[serial]
    fn test_load_config_from_env_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let mut file = fs::File::create(&config_path).unwrap();
        writeln!(file, "[run]\nchunk_len = 25").unwrap();

        let config = with_config_env(&config_path, load_config).unwrap();
        assert_eq!(config.run.chunk_len, 25);
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing.toml");

        let config = with_config_env(&config_path, load_config).unwrap();
        assert_eq!(config, Config::default());
    }
}
