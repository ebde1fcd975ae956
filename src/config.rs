//! Application configuration and data file loading.
//!
//! Three kinds of JSON files feed the simulator:
//!
//! - `appconfig.json`: server, paths and logging settings ([`AppConfig`])
//! - device descriptions in the devices directory ([`DeviceDescription`])
//! - custom OID lists in the custom directory ([`CustomOidList`])
//!
//! Missing files fall back to defaults. Files that exist but cannot be read
//! are either reported as errors ([`load_device`]) or skipped with a warning
//! ([`load_custom_dir`], [`AppConfig::load_or_default`]).

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agent::DEFAULT_PORT;
use crate::error::{Error, Result};
use crate::store::{CustomOidList, DeviceDescription};
use crate::util::socket_addr;

/// Contents of `appconfig.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServerConfig {
    pub ip_address: String,
    pub port: u16,
    pub community: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip_address: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            community: "public".to_string(),
        }
    }
}

impl ServerConfig {
    /// The address the agent should bind.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        socket_addr(&self.ip_address, self.port).map_err(|e| Error::io(None, e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PathsConfig {
    pub devices_directory: PathBuf,
    pub custom_directory: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            devices_directory: PathBuf::from("devices"),
            custom_directory: PathBuf::from("custom"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoggingConfig {
    pub log_level: LogLevel,
    pub log_to_console: bool,
    pub log_to_file: bool,
    pub log_file_path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Information,
            log_to_console: true,
            log_to_file: false,
            log_file_path: PathBuf::from("logs/snmpsim.log"),
        }
    }
}

/// Log verbosity, spelled the way the configuration file spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    #[serde(alias = "Info")]
    Information,
    #[serde(alias = "Warn")]
    Warning,
    Error,
    Critical,
    None,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Information => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
            LogLevel::None => "off",
        }
    }
}

impl AppConfig {
    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }

    /// Load `path`, using defaults when it is missing or unusable.
    ///
    /// A missing file is normal and silent. Any other failure is logged as a
    /// warning and the defaults are used.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(target: "snmp_sim::config", { path = %path.display() }, "no configuration file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(target: "snmp_sim::config", { error = %e }, "ignoring configuration file, using defaults");
                Self::default()
            }
        }
    }
}

/// `*.json` files directly under `dir`, sorted by file name.
///
/// A directory that does not exist has no files.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(Some(dir.to_path_buf()), e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(Some(dir.to_path_buf()), e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(Some(path.to_path_buf()), e))?;
    serde_json::from_str(&content).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Read one device description file.
pub fn read_device(path: &Path) -> Result<DeviceDescription> {
    read_json(path)
}

/// Pick and read the device description.
///
/// `explicit` (from `--device`) wins. Otherwise the first `*.json` file in
/// `devices_dir` by name is used, and with none there the built-in default
/// device. Returns the file the description came from, if any.
pub fn load_device(
    devices_dir: &Path,
    explicit: Option<&Path>,
) -> Result<(DeviceDescription, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => json_files(devices_dir)?.into_iter().next(),
    };

    match path {
        Some(path) => {
            let device = read_device(&path)?;
            tracing::info!(
                target: "snmp_sim::config",
                { path = %path.display(), interfaces = device.interfaces.len() },
                "loaded device description"
            );
            Ok((device, Some(path)))
        }
        None => {
            tracing::info!(target: "snmp_sim::config", { dir = %devices_dir.display() }, "no device files, using built-in device");
            Ok((DeviceDescription::default(), None))
        }
    }
}

/// Read one custom OID file: a JSON array of `{ "oid", "type", "value" }`.
///
/// The list is named after the file name for build reports. Only a file that
/// is not a JSON array fails as a whole; an element with the wrong shape is
/// kept in [`CustomOidList::rejected`] and its siblings still load.
pub fn read_custom_list(path: &Path) -> Result<CustomOidList> {
    let values: Vec<serde_json::Value> = read_json(path)?;
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let list = CustomOidList::from_json_values(source, values);
    for rejected in &list.rejected {
        tracing::warn!(
            target: "snmp_sim::config",
            { path = %path.display(), entry = %rejected.key, reason = %rejected.reason },
            "skipping malformed custom OID entry"
        );
    }
    Ok(list)
}

/// Read every custom OID file in `dir`, in file name order.
///
/// Files that cannot be read or parsed are skipped with a warning; the order
/// of the remaining lists decides which value wins for a repeated OID.
pub fn load_custom_dir(dir: &Path) -> Vec<CustomOidList> {
    let files = match json_files(dir) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(target: "snmp_sim::config", { error = %e }, "cannot list custom OID directory");
            return Vec::new();
        }
    };

    files
        .iter()
        .filter_map(|path| match read_custom_list(path) {
            Ok(list) => {
                tracing::debug!(
                    target: "snmp_sim::config",
                    { path = %path.display(), entries = list.entries.len() },
                    "loaded custom OID file"
                );
                Some(list)
            }
            Err(e) => {
                tracing::warn!(target: "snmp_sim::config", { error = %e }, "skipping custom OID file");
                None
            }
        })
        .collect()
}
