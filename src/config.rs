//! Agent configuration
//!
//! Loaded from `$XDG_CONFIG_HOME/netbox-agent/config.yaml` unless a path is
//! given on the command line. Every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AgentError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub netbox: NetboxSettings,

    #[serde(default)]
    pub device: DeviceSettings,

    /// Facts that win over what SMBIOS reports
    #[serde(default)]
    pub overrides: Overrides,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetboxSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_true")]
    pub ssl_verify: bool,
}

fn default_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for NetboxSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            ssl_verify: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    #[serde(default = "default_server_role")]
    pub server_role: String,

    #[serde(default = "default_blade_role")]
    pub blade_role: String,

    #[serde(default = "default_chassis_role")]
    pub chassis_role: String,

    /// Platform name; defaults to the running OS release
    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Shell command printing the hostname to register
    #[serde(default)]
    pub hostname_cmd: Option<String>,

    /// Slug of the NetBox site the device lives in
    #[serde(default)]
    pub datacenter: Option<String>,
}

fn default_server_role() -> String {
    "Server".to_string()
}
fn default_blade_role() -> String {
    "Blade".to_string()
}
fn default_chassis_role() -> String {
    "Server Chassis".to_string()
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            server_role: default_server_role(),
            blade_role: default_blade_role(),
            chassis_role: default_chassis_role(),
            platform: None,
            tags: Vec::new(),
            hostname_cmd: None,
            datacenter: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default)]
    pub blade: Option<bool>,

    #[serde(default)]
    pub blade_slot: Option<String>,

    #[serde(default)]
    pub chassis_serial: Option<String>,

    #[serde(default)]
    pub chassis_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_lshw")]
    pub lshw: String,

    #[serde(default = "default_nvme")]
    pub nvme: String,
}

fn default_lshw() -> String {
    "lshw".to_string()
}
fn default_nvme() -> String {
    "nvme".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            lshw: default_lshw(),
            nvme: default_nvme(),
        }
    }
}

impl AgentConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("netbox-agent")
            .join("config.yaml")
    }

    /// Load the default config file, or defaults when there is none.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            AgentError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.netbox.url, "http://localhost:8000");
        assert!(config.netbox.ssl_verify);
        assert_eq!(config.device.chassis_role, "Server Chassis");
        assert_eq!(config.tools.nvme, "nvme");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "netbox:\n  url: https://netbox.example.com\n  token: abc\ndevice:\n  tags: [agent, prod]\n  datacenter: par1\noverrides:\n  blade_slot: \"4\""
        )
        .unwrap();

        let config = AgentConfig::load_from(file.path()).unwrap();
        assert_eq!(config.netbox.url, "https://netbox.example.com");
        assert_eq!(config.netbox.token.as_deref(), Some("abc"));
        assert!(config.netbox.ssl_verify);
        assert_eq!(config.device.tags, vec!["agent", "prod"]);
        assert_eq!(config.device.blade_role, "Blade");
        assert_eq!(config.overrides.blade_slot.as_deref(), Some("4"));
        assert_eq!(config.tools.lshw, "lshw");
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "netbox: [unclosed").unwrap();
        assert!(matches!(
            AgentConfig::load_from(file.path()),
            Err(AgentError::Config(_))
        ));
    }
}
