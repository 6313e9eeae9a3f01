use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::home_dir::resolve_home_dir;

/// Environment overrides: `APP__SERVER__PORT=8080` sets `server.port`.
pub const ENV_PREFIX: &str = "APP__";

/// Directory under the platform home used when `server.home_dir` is empty.
const DEFAULT_HOME_SUBDIR: &str = ".user-dashboard";

/// Whole-application settings. Global sections are typed; each module reads
/// its own entry from `modules` (see [`crate::AppConfigProvider`]).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// `None` falls back to [`default_logging_config`].
    pub logging: Option<LoggingConfig>,
    /// Extra `<module>.yaml` files merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Absolute after loading; empty means the platform default.
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds; 0 disables it.
    #[serde(default)]
    pub timeout_sec: u64,
}

/// Subsystem name → logging section. `"default"` catches every target
/// no other key claims.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    /// `trace`..`error`, or `off`.
    pub console_level: String,
    /// Relative paths resolve against `server.home_dir`; empty disables the file.
    pub file: String,
    #[serde(default)]
    pub file_level: String,
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            host: "127.0.0.1".into(),
            port: 3000,
            timeout_sec: 0,
        }
    }
}

impl ServerConfig {
    /// Replace `home_dir` with its absolute form, creating the directory.
    fn normalize_home_dir(&mut self) -> Result<()> {
        let configured = Some(self.home_dir.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let resolved: PathBuf = resolve_home_dir(configured, DEFAULT_HOME_SUBDIR, true)
            .context("home_dir normalization failed")?;
        self.home_dir = resolved.to_string_lossy().into_owned();
        Ok(())
    }
}

/// Console at info, everything at debug into `logs/dashboard.log`.
pub fn default_logging_config() -> LoggingConfig {
    let section = Section {
        console_level: "info".into(),
        file: "logs/dashboard.log".into(),
        file_level: "debug".into(),
        max_age_days: Some(7),
        max_backups: Some(3),
        max_size_mb: Some(100),
    };
    HashMap::from([("default".to_string(), section)])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: Some(default_logging_config()),
            ..Self::bare()
        }
    }
}

impl AppConfig {
    /// Server defaults only; optional sections stay empty so a file must opt in.
    fn bare() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        }
    }

    /// Defaults, then the YAML file, then `APP__*` environment variables.
    /// `server.home_dir` comes back absolute and created.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.is_file() {
            anyhow::bail!("config file not found: {}", config_path.display());
        }

        let mut config: AppConfig = Figment::new()
            .merge(Serialized::defaults(Self::bare()))
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

        config
            .server
            .normalize_home_dir()
            .context("Failed to resolve server.home_dir")?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }
        Ok(config)
    }

    /// [`Self::load_layered`] when a path is given, built-in defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        let Some(path) = config_path else {
            let mut config = Self::default();
            config
                .server
                .normalize_home_dir()
                .context("Failed to resolve server.home_dir (defaults)")?;
            return Ok(config);
        };
        Self::load_layered(path)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// `--port` replaces `server.port`; each `-v` raises the default console
    /// level one step (debug, then trace).
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        let level = match args.verbose {
            0 => return,
            1 => "debug",
            _ => "trace",
        };
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(section) = logging.get_mut("default") {
            section.console_level = level.to_string();
        }
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Command line arguments relevant to configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
}

/// Fold `<modules_dir>/<module>.yaml` files into the module bag, keyed by file stem.
fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(());
    }
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list modules_dir {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        let Some(module) = module_name_of(&path) else {
            continue;
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module config {}", path.display()))?;
        let value: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?;
        bag.insert(module, serde_json::to_value(value)?);
    }
    Ok(())
}

fn module_name_of(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    let is_yaml = ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml");
    if !is_yaml || !path.is_file() {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_owned)
}
