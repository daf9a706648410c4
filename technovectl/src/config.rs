//! CLI configuration management
//!
//! Handles loading and saving CLI-specific configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Station host name or IP address
    pub host: String,

    /// Station HTTP port
    pub port: u16,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            // Stations get addresses from home DHCP, so there is no
            // sensible default host. An empty value means "not set".
            host: String::new(),
            port: 80,
            output_format: "table".to_string(),
            verbose: false,
            timeout: 8,
        }
    }
}

impl CliConfig {
    /// Load configuration from the default path or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file or create default
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read CLI config file")?;

            toml::from_str(&content).context("Failed to parse CLI config file")
        } else {
            // Create default config and save it
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;

        std::fs::write(path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".config")
        } else {
            return Err(anyhow::anyhow!("Cannot determine config directory"));
        };

        Ok(config_dir.join("technove").join("cli.toml"))
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set station host (with validation)
    pub fn with_host(mut self, host: impl Into<String>) -> Result<Self> {
        let host = host.into();
        Self::validate_host(&host)?;
        self.host = Some(host);
        Ok(self)
    }

    /// Set station port (with validation)
    pub fn with_port(mut self, port: u16) -> Result<Self> {
        Self::validate_port(port)?;
        self.port = Some(port);
        Ok(self)
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Load configuration from a file, the default one when `path` is None
    pub fn with_config_file(self, path: Option<&str>) -> Result<Self> {
        let loaded = match path {
            Some(path) => CliConfig::load_from(Path::new(path)),
            None => CliConfig::load(),
        };

        match loaded {
            Ok(config) => {
                let builder = self;
                // An empty host in the file means "not set yet"
                let file_host = if config.host.is_empty() {
                    None
                } else {
                    Some(config.host)
                };

                // Only use file values if they weren't already set (preserving priority)
                Ok(Self {
                    host: builder.host.or(file_host),
                    port: builder.port.or(Some(config.port)),
                    output_format: builder.output_format.or(Some(config.output_format)),
                    verbose: builder.verbose.or(Some(config.verbose)),
                    timeout: builder.timeout.or(Some(config.timeout)),
                })
            }
            // A broken default config should not block the CLI, but a file
            // the user named explicitly must load.
            Err(e) if path.is_some() => Err(e),
            Err(_) => Ok(self),
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        // Only apply env vars if values weren't already set (preserving priority)
        if self.host.is_none() {
            if let Ok(host) = std::env::var("TECHNOVE_HOST") {
                // Validate before applying
                if Self::validate_host(&host).is_ok() {
                    self.host = Some(host);
                }
            }
        }

        if self.port.is_none() {
            if let Ok(port) = std::env::var("TECHNOVE_PORT") {
                if let Ok(port) = port.parse() {
                    // Validate before applying
                    if Self::validate_port(port).is_ok() {
                        self.port = Some(port);
                    }
                }
            }
        }

        if self.output_format.is_none() {
            if let Ok(format) = std::env::var("TECHNOVE_FORMAT") {
                // Validate before applying
                if Self::validate_output_format(&format).is_ok() {
                    self.output_format = Some(format);
                }
            }
        }

        if self.verbose.is_none() {
            if let Ok(verbose) = std::env::var("TECHNOVE_VERBOSE") {
                self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
            }
        }

        if self.timeout.is_none() {
            if let Ok(timeout) = std::env::var("TECHNOVE_TIMEOUT") {
                if let Ok(timeout) = timeout.parse() {
                    // Validate before applying
                    if Self::validate_timeout(timeout).is_ok() {
                        self.timeout = Some(timeout);
                    }
                }
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let host = self.host.unwrap_or(defaults.host);
        let port = self.port.unwrap_or(defaults.port);
        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        // Validate final values. A host may legitimately still be unset at
        // this point; commands that talk to the station check for that.
        if !host.is_empty() {
            Self::validate_host(&host)?;
        }
        Self::validate_port(port)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            host,
            port,
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
        })
    }

    /// Validate host format
    fn validate_host(host: &str) -> Result<()> {
        if host.is_empty() {
            return Err(anyhow::anyhow!("Station host cannot be empty"));
        }

        // The client builds the URL itself; only a bare host belongs here
        if host.contains("://") || host.contains('/') {
            return Err(anyhow::anyhow!(
                "Station host must be a host name or IP address, not a URL"
            ));
        }

        Ok(())
    }

    /// Validate port value
    fn validate_port(port: u16) -> Result<()> {
        if port == 0 {
            return Err(anyhow::anyhow!("Port must be greater than 0"));
        }

        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}
