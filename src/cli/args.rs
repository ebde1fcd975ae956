//! Command-line arguments for `snmp-sim`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::agent::MissingValue;
use crate::config::{AppConfig, LoggingConfig};

/// SNMP agent simulator answering GET and GETNEXT from device tables.
///
/// Flags override the matching `appconfig.json` settings.
#[derive(Debug, Parser)]
#[command(name = "snmp-sim", version, about)]
pub struct Args {
    /// Configuration file.
    #[arg(short, long, default_value = "appconfig.json", value_name = "FILE")]
    pub config: PathBuf,

    /// IP address to listen on.
    #[arg(long, value_name = "IP")]
    pub bind: Option<String>,

    /// UDP port to listen on.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Community string requests must carry.
    #[arg(long)]
    pub community: Option<String>,

    /// Directory holding device description files.
    #[arg(long, value_name = "DIR")]
    pub devices_dir: Option<PathBuf>,

    /// Directory holding custom OID files.
    #[arg(long, value_name = "DIR")]
    pub custom_dir: Option<PathBuf>,

    /// Device description to load instead of the first file in the devices directory.
    #[arg(long, value_name = "FILE")]
    pub device: Option<PathBuf>,

    /// Answer unknown OIDs with SNMPv2 exceptions instead of NULL (v2c only).
    #[arg(long)]
    pub exceptions: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Enable trace logging (includes packet dumps).
    #[arg(long, conflicts_with = "debug")]
    pub trace: bool,
}

impl Args {
    /// Fold the flags into a loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ip) = &self.bind {
            config.server.ip_address = ip.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(community) = &self.community {
            config.server.community = community.clone();
        }
        if let Some(dir) = &self.devices_dir {
            config.paths.devices_directory = dir.clone();
        }
        if let Some(dir) = &self.custom_dir {
            config.paths.custom_directory = dir.clone();
        }
    }

    pub fn missing_value(&self) -> MissingValue {
        if self.exceptions {
            MissingValue::Exception
        } else {
            MissingValue::Null
        }
    }

    fn filter_directive(&self, logging: &LoggingConfig) -> String {
        let level = if self.trace {
            "trace"
        } else if self.debug {
            "debug"
        } else {
            logging.log_level.as_filter()
        };
        match level {
            "off" => "off".to_string(),
            level => format!("warn,snmp_sim={level}"),
        }
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over both the configured level and `--debug`/`--trace`.
    /// Logging to a file that cannot be opened falls back to console only,
    /// with a warning once the subscriber is up.
    pub fn init_tracing(&self, logging: &LoggingConfig) {
        let directive = self.filter_directive(logging);
        let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

        let console = logging.log_to_console.then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(filter())
        });

        let mut file_error = None;
        let file = if logging.log_to_file {
            if let Some(parent) = logging.log_file_path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&logging.log_file_path)
            {
                Ok(file) => Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Arc::new(file))
                        .with_ansi(false)
                        .with_filter(filter()),
                ),
                Err(e) => {
                    file_error = Some(e);
                    None
                }
            }
        } else {
            None
        };

        let _ = tracing_subscriber::registry().with(console).with(file).try_init();

        if let Some(e) = file_error {
            tracing::warn!(
                target: "snmp_sim::config",
                { path = %logging.log_file_path.display(), error = %e },
                "cannot open log file, logging to console only"
            );
        }
    }
}
