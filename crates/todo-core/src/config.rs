use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the platform config dir that holds todo state.
pub const APP_DIR_NAME: &str = "todo";

/// Environment variable naming the database file directly.
pub const DB_PATH_ENV: &str = "TODO_DB_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            filename: default_filename(),
        }
    }
}

fn default_filename() -> String {
    "todo.db".to_string()
}

/// `<config_dir>/todo`, or `None` when the platform has no config dir.
#[must_use]
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Load `<config_dir>/todo/config.toml`, or defaults when it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = app_config_dir() else {
        return Ok(UserConfig::default());
    };
    load_user_config_from(&config_dir.join("config.toml"))
}

/// # Errors
///
/// Returns an error if `path` exists but cannot be read or parsed.
pub fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// The path named by `--db` or a non-blank `TODO_DB_PATH`, which never
/// depend on the config file.
#[must_use]
pub fn explicit_database_path(flag: Option<&Path>, env: Option<&str>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        env.map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

/// Pick the database file.
///
/// Precedence: `flag` > `env` > `database.path` > `<config_dir>/<database.filename>`.
///
/// # Errors
///
/// Returns an error when falling back to the config dir with an empty
/// filename, or when there is no config dir at all.
pub fn resolve_database_path(
    config: &UserConfig,
    flag: Option<&Path>,
    env: Option<&str>,
    config_dir: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = explicit_database_path(flag, env) {
        return Ok(path);
    }

    if let Some(path) = &config.database.path {
        return Ok(path.clone());
    }

    let filename = config.database.filename.trim();
    if filename.is_empty() {
        bail!("database.filename must not be empty");
    }

    let Some(dir) = config_dir else {
        bail!("no config directory on this platform; set {DB_PATH_ENV} or pass --db");
    };
    Ok(dir.join(filename))
}

/// Resolve the database path from the user config file, the environment,
/// and an optional CLI override.
///
/// The config file is only read when neither override is set, so a broken
/// `config.toml` cannot block `--db` or `TODO_DB_PATH`.
///
/// # Errors
///
/// Returns an error if the config file is unreadable or no path can be
/// resolved.
pub fn database_path(flag: Option<&Path>) -> Result<PathBuf> {
    let env = std::env::var(DB_PATH_ENV).ok();
    if let Some(path) = explicit_database_path(flag, env.as_deref()) {
        return Ok(path);
    }

    let config = load_user_config()?;
    resolve_database_path(&config, None, None, app_config_dir().as_deref())
}
