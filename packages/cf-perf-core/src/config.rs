//! Benchmark suite configuration.
//!
//! Loaded once per run from `config.{toml,yaml,yml,json}` in the working
//! directory or `$HOME/.cf-performance-tests`, then overridden by `CF_PERF_*`
//! environment variables. Durations use humantime syntax (`"30s"`, `"2m"`).

use crate::error::{PerfError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base name of the config file, without extension.
pub const CONFIG_NAME: &str = "config";

/// Directory under `$HOME` searched after the working directory.
pub const HOME_CONFIG_DIR: &str = ".cf-performance-tests";

/// Extensions tried, in order, for each search directory.
pub const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Prefix for environment overrides, e.g. `CF_PERF_SAMPLES=10`.
pub const ENV_PREFIX: &str = "CF_PERF_";

/// Largest `per_page` the v3 API accepts.
pub const MAX_PAGE_SIZE: usize = 5000;

/// Suite configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// API endpoint passed to `cf api`
    pub api: String,
    /// Admin username
    pub admin_user: String,
    /// Admin password
    pub admin_password: String,
    /// Pass `--skip-ssl-validation` to `cf api` (default: false)
    pub skip_ssl_validation: bool,
    /// Path or name of the cf executable (default: "cf")
    pub cf_binary: PathBuf,
    /// Prefix for generated org, space and user names (default: "perf")
    pub name_prefix: String,
    /// Timeout for ordinary requests (default: 30s)
    #[serde(with = "humantime_serde")]
    pub basic_timeout: Duration,
    /// Timeout for large pages and deletion polling (default: 2m)
    #[serde(with = "humantime_serde")]
    pub long_timeout: Duration,
    /// Delay between polls while waiting for a resource to disappear (default: 1s)
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Number of samples per experiment (default: 5)
    pub samples: usize,
    /// Upper bound on total sampling time per experiment, 0 = unbounded
    #[serde(with = "humantime_serde")]
    pub sample_length: Duration,
    /// `per_page` used by large page cases (default: 500)
    pub large_page_size: usize,
    /// Reuse an existing regular user instead of creating one
    pub use_existing_user: bool,
    pub existing_user: String,
    pub existing_user_password: String,
    /// Reuse an existing org/space instead of creating them
    pub use_existing_organization: bool,
    pub existing_organization: String,
    pub existing_space: String,
    /// Directory for JSON reports; no report is written when unset
    pub results_folder: Option<PathBuf>,
    /// Report metadata
    pub cf_deployment_version: Option<String>,
    pub capi_version: Option<String>,
    /// Only run cases whose name contains this string
    pub focus: Option<String>,
    /// Skip cases that delete resources
    pub skip_destructive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: String::new(),
            admin_user: String::new(),
            admin_password: String::new(),
            skip_ssl_validation: false,
            cf_binary: PathBuf::from("cf"),
            name_prefix: "perf".to_string(),
            basic_timeout: Duration::from_secs(30),
            long_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(1),
            samples: 5,
            sample_length: Duration::ZERO,
            large_page_size: 500,
            use_existing_user: false,
            existing_user: String::new(),
            existing_user_password: String::new(),
            use_existing_organization: false,
            existing_organization: String::new(),
            existing_space: String::new(),
            results_folder: None,
            cf_deployment_version: None,
            capi_version: None,
            focus: None,
            skip_destructive: false,
        }
    }
}

impl Config {
    /// Loads, overrides and validates the configuration.
    ///
    /// An explicit path wins; otherwise the standard locations are searched.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let home = env::var_os("HOME").map(PathBuf::from);
                Self::discover(&search_dirs(home.as_deref()))?
            }
        };
        tracing::info!("Loading config from {}", path.display());

        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the first existing `config.<ext>` in `dirs`.
    pub fn discover(dirs: &[PathBuf]) -> Result<PathBuf> {
        let mut searched = Vec::new();
        for dir in dirs {
            for ext in CONFIG_EXTENSIONS {
                let candidate = dir.join(format!("{}.{}", CONFIG_NAME, ext));
                if candidate.is_file() {
                    return Ok(candidate);
                }
                searched.push(candidate.display().to_string());
            }
        }
        Err(PerfError::ConfigNotFound {
            searched: searched.join(", "),
        })
    }

    /// Reads a config file, choosing the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PerfError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content),
        }
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PerfError::Config(format!("Invalid TOML: {}", e)))
    }

    pub fn from_yaml(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| PerfError::Config(format!("Invalid YAML: {}", e)))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| PerfError::Config(format!("Invalid JSON: {}", e)))
    }

    /// Applies `CF_PERF_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a full variable name
    /// (e.g. `CF_PERF_SAMPLES`) to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(val) = get("API") {
            self.api = val;
        }
        if let Some(val) = get("ADMIN_USER") {
            self.admin_user = val;
        }
        if let Some(val) = get("ADMIN_PASSWORD") {
            self.admin_password = val;
        }
        if let Some(val) = get("SKIP_SSL_VALIDATION") {
            self.skip_ssl_validation = parse_value("skip_ssl_validation", &val)?;
        }
        if let Some(val) = get("CF_BINARY") {
            self.cf_binary = PathBuf::from(val);
        }
        if let Some(val) = get("NAME_PREFIX") {
            self.name_prefix = val;
        }
        if let Some(val) = get("BASIC_TIMEOUT") {
            self.basic_timeout = parse_duration("basic_timeout", &val)?;
        }
        if let Some(val) = get("LONG_TIMEOUT") {
            self.long_timeout = parse_duration("long_timeout", &val)?;
        }
        if let Some(val) = get("POLL_INTERVAL") {
            self.poll_interval = parse_duration("poll_interval", &val)?;
        }
        if let Some(val) = get("SAMPLES") {
            self.samples = parse_value("samples", &val)?;
        }
        if let Some(val) = get("SAMPLE_LENGTH") {
            self.sample_length = parse_duration("sample_length", &val)?;
        }
        if let Some(val) = get("LARGE_PAGE_SIZE") {
            self.large_page_size = parse_value("large_page_size", &val)?;
        }
        if let Some(val) = get("USE_EXISTING_USER") {
            self.use_existing_user = parse_value("use_existing_user", &val)?;
        }
        if let Some(val) = get("EXISTING_USER") {
            self.existing_user = val;
        }
        if let Some(val) = get("EXISTING_USER_PASSWORD") {
            self.existing_user_password = val;
        }
        if let Some(val) = get("USE_EXISTING_ORGANIZATION") {
            self.use_existing_organization = parse_value("use_existing_organization", &val)?;
        }
        if let Some(val) = get("EXISTING_ORGANIZATION") {
            self.existing_organization = val;
        }
        if let Some(val) = get("EXISTING_SPACE") {
            self.existing_space = val;
        }
        if let Some(val) = get("CF_DEPLOYMENT_VERSION") {
            self.cf_deployment_version = Some(val);
        }
        if let Some(val) = get("CAPI_VERSION") {
            self.capi_version = Some(val);
        }
        if let Some(val) = get("RESULTS_FOLDER") {
            self.results_folder = Some(PathBuf::from(val));
        }
        if let Some(val) = get("FOCUS") {
            self.focus = Some(val);
        }
        if let Some(val) = get("SKIP_DESTRUCTIVE") {
            self.skip_destructive = parse_value("skip_destructive", &val)?;
        }
        Ok(())
    }

    /// Checks required fields and value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.api.trim().is_empty() {
            return Err(PerfError::Config("api must be set".to_string()));
        }
        if self.admin_user.is_empty() || self.admin_password.is_empty() {
            return Err(PerfError::Config(
                "admin_user and admin_password must be set".to_string(),
            ));
        }
        if self.basic_timeout.is_zero() || self.long_timeout.is_zero() {
            return Err(PerfError::Config(
                "basic_timeout and long_timeout must be greater than 0".to_string(),
            ));
        }
        if self.samples == 0 && self.sample_length.is_zero() {
            return Err(PerfError::Config(
                "at least one of samples or sample_length must be set".to_string(),
            ));
        }
        if self.large_page_size == 0 || self.large_page_size > MAX_PAGE_SIZE {
            return Err(PerfError::Config(format!(
                "large_page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.large_page_size
            )));
        }
        if self.use_existing_user
            && (self.existing_user.is_empty() || self.existing_user_password.is_empty())
        {
            return Err(PerfError::Config(
                "use_existing_user requires existing_user and existing_user_password".to_string(),
            ));
        }
        if self.use_existing_organization
            && (self.existing_organization.is_empty() || self.existing_space.is_empty())
        {
            return Err(PerfError::Config(
                "use_existing_organization requires existing_organization and existing_space"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Directories searched for the config file: `.` then `$HOME/.cf-performance-tests`.
pub fn search_dirs(home: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    if let Some(home) = home {
        dirs.push(home.join(HOME_CONFIG_DIR));
    }
    dirs
}

fn parse_value<T: std::str::FromStr>(field: &str, val: &str) -> Result<T> {
    val.trim()
        .parse()
        .map_err(|_| PerfError::Config(format!("Invalid {}: {}", field, val)))
}

/// Parses a humantime duration such as `"90s"` or `"2m"`.
pub fn parse_duration(field: &str, val: &str) -> Result<Duration> {
    humantime_serde::re::humantime::parse_duration(val.trim())
        .map_err(|e| PerfError::Config(format!("Invalid {}: {} ({})", field, val, e)))
}
