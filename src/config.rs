use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "parsert-server", version, about)]
pub struct Cli {
    /// Path to configuration file
    #[clap(long, default_value = "./config.toml")]
    pub config: PathBuf,

    /// Override listen address
    #[clap(long)]
    pub bind: Option<IpAddr>,

    /// Override listen port
    #[clap(long)]
    pub port: Option<u16>,

    /// Override SMS log file path
    #[clap(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

fn default_log_file() -> PathBuf {
    PathBuf::from("sms_log.txt")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    // A missing file just means defaults; anything else is a real problem
    let mut config: Config = match fs::read_to_string(&cli.config) {
        Ok(content) => toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", cli.config))?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No config file at {:?}, using defaults", cli.config);
            Config::default()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read config file: {:?}", cli.config))
        }
    };

    // Apply CLI overrides
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    if let Some(port) = cli.port {
        config.port = port;
    }

    if let Some(ref log_file) = cli.log_file {
        config.log_file = log_file.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli_for(path: PathBuf) -> Cli {
        Cli {
            config: path,
            bind: None,
            port: None,
            log_file: None,
        }
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&cli_for(dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.log_file, PathBuf::from("sms_log.txt"));
    }

    #[test]
    fn file_values_are_read_and_partial_files_keep_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = 9090\nlog_file = \"/tmp/inbox.txt\"\n").unwrap();

        let config = load_config(&cli_for(path)).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.log_file, PathBuf::from("/tmp/inbox.txt"));
        assert_eq!(config.bind, default_bind());
    }

    #[test]
    fn cli_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "bind = \"0.0.0.0\"\nport = 9090\n").unwrap();

        let cli = Cli {
            config: path,
            bind: Some("127.0.0.1".parse().unwrap()),
            port: Some(8123),
            log_file: Some(PathBuf::from("other.txt")),
        };
        let config = load_config(&cli).unwrap();

        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:8123");
        assert_eq!(config.log_file, PathBuf::from("other.txt"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = \"not a number\"").unwrap();

        let err = load_config(&cli_for(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["parsert-server", "--port", "8080", "--log-file", "x.txt"]);

        assert_eq!(cli.config, PathBuf::from("./config.toml"));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.log_file, Some(PathBuf::from("x.txt")));
        assert!(cli.bind.is_none());
    }
}
