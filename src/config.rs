//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/manila-functional/config.toml`
//! 3. Explicit config file passed to [`Settings::load`]
//! 4. Environment variables: `MANILA_FUNCTIONAL__*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "MANILA_FUNCTIONAL";

/// Keystone credentials of one actor (admin or plain user).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub tenant_name: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "demo".into(),
            tenant_name: "demo".into(),
            password: String::new(),
        }
    }
}

/// Poll intervals and timeouts, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WaiterConfig {
    /// Generic resource waiter interval
    pub build_interval_secs: u64,
    /// Generic resource waiter timeout
    pub build_timeout_secs: u64,
    /// Share type deletion interval
    pub share_type_interval_secs: u64,
    /// Share type deletion timeout
    pub share_type_timeout_secs: u64,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            build_interval_secs: 3,
            build_timeout_secs: 180,
            share_type_interval_secs: 2,
            share_type_timeout_secs: 6,
        }
    }
}

impl WaiterConfig {
    pub fn build_interval(&self) -> Duration {
        Duration::from_secs(self.build_interval_secs)
    }

    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout_secs)
    }

    pub fn share_type_interval(&self) -> Duration {
        Duration::from_secs(self.share_type_interval_secs)
    }

    pub fn share_type_timeout(&self) -> Duration {
        Duration::from_secs(self.share_type_timeout_secs)
    }
}

/// Unified configuration for the functional client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the `manila` and `openstack` executables
    pub cli_dir: PathBuf,
    /// Words prepended to every command (e.g. `sudo -E`)
    pub prefix: String,
    /// Keystone endpoint
    pub auth_url: String,
    /// Service catalog endpoint type passed to manila
    pub endpoint_type: String,
    /// Pass `--insecure` to the CLIs
    pub insecure: bool,
    /// Privileged actor
    pub admin: Credentials,
    /// Non-privileged actor
    pub user: Credentials,
    pub waiter: WaiterConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cli_dir: PathBuf::from("/usr/bin"),
            prefix: String::new(),
            auth_url: String::new(),
            endpoint_type: "publicURL".into(),
            insecure: false,
            admin: Credentials {
                username: "admin".into(),
                tenant_name: "admin".into(),
                password: String::new(),
            },
            user: Credentials::default(),
            waiter: WaiterConfig::default(),
        }
    }
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "manila-functional").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit TOML file; must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(global_path) = global_config_path() {
            builder = builder.add_source(
                File::from(global_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        if let Some(path) = config_file {
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let mut settings: Settings = builder
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;

        settings.expand_paths()?;
        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in `cli_dir`.
    fn expand_paths(&mut self) -> Result<(), ApplicationError> {
        let raw = self.cli_dir.to_string_lossy().to_string();
        let expanded = shellexpand::full(&raw).map_err(|e| ApplicationError::Config {
            message: format!("expand cli_dir {}: {}", raw, e),
        })?;
        self.cli_dir = PathBuf::from(expanded.as_ref());
        Ok(())
    }

    /// Whether enough is configured to talk to a live cloud.
    pub fn has_cloud(&self) -> bool {
        !self.auth_url.is_empty()
    }

    /// Show the effective configuration as TOML, passwords masked.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut masked = self.clone();
        for creds in [&mut masked.admin, &mut masked.user] {
            if !creds.password.is_empty() {
                creds.password = "***".into();
            }
        }
        toml::to_string_pretty(&masked).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# manila-functional configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/manila-functional/config.toml
#   File:   explicit path given by the caller
#   Env:    MANILA_FUNCTIONAL__* variables, e.g. MANILA_FUNCTIONAL__ADMIN__PASSWORD

# Directory containing the manila and openstack executables
# cli_dir = "/usr/bin"

# Words prepended to every command
# prefix = ""

# Keystone endpoint; live tests are skipped while empty
# auth_url = "http://keystone:5000/v2.0"

# endpoint_type = "publicURL"
# insecure = false

[admin]
# username = "admin"
# tenant_name = "admin"
# password = ""

[user]
# username = "demo"
# tenant_name = "demo"
# password = ""

[waiter]
# build_interval_secs = 3
# build_timeout_secs = 180
# share_type_interval_secs = 2
# share_type_timeout_secs = 6
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
