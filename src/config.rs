use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_METRIC_UNITS: &str = "true";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ALLOW_HTTP: bool = true;
pub const DEFAULT_LOG_FILE: &str = "flightlog-tui.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Stored units preference; the literal "false" selects imperial
    /// display, any other value metric.
    pub metric_units: String,
    pub timeout_secs: u64,
    pub insecure: bool,
    pub allow_http: bool,
    pub allow_insecure: bool,
    pub config_path: PathBuf,
    pub log_enabled: bool,
    pub log_level: String,
    pub log_file: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    metric_units: Option<String>,
    timeout_secs: Option<u64>,
    insecure: Option<bool>,
    allow_http: Option<bool>,
    allow_insecure: Option<bool>,
    log_enabled: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

pub fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut explicit_config: Option<PathBuf> = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let value = iter
                .next()
                .ok_or_else(|| anyhow!("--config needs a value"))?;
            explicit_config = Some(PathBuf::from(value));
        }
    }

    let env_config = env::var("FLIGHTLOG_CONFIG").ok().map(PathBuf::from);
    let config_path = explicit_config
        .clone()
        .or(env_config)
        .unwrap_or_else(|| PathBuf::from("flightlog-tui.toml"));

    let mut config = Config {
        base_url: DEFAULT_BASE_URL.to_string(),
        metric_units: DEFAULT_METRIC_UNITS.to_string(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
        insecure: false,
        allow_http: DEFAULT_ALLOW_HTTP,
        allow_insecure: false,
        config_path: config_path.clone(),
        log_enabled: false,
        log_level: "info".to_string(),
        log_file: DEFAULT_LOG_FILE.to_string(),
    };

    if config_path.exists() {
        if let Some(file_config) = load_file_config(&config_path)? {
            apply_file_config(&mut config, file_config);
        }
    } else if explicit_config.is_some() {
        return Err(anyhow!("Config file not found: {}", config_path.display()));
    }

    config.config_path = config_path;

    if let Ok(value) = env::var("FLIGHTLOG_BASE_URL") {
        config.base_url = value;
    }
    if let Ok(value) = env::var("FLIGHTLOG_METRIC_UNITS") {
        config.metric_units = value;
    }
    if let Ok(value) = env::var("FLIGHTLOG_TIMEOUT") {
        if let Ok(secs) = value.parse::<u64>() {
            config.timeout_secs = secs.max(1);
        }
    }
    if let Ok(value) = env::var("FLIGHTLOG_INSECURE") {
        config.insecure = matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    if let Ok(value) = env::var("FLIGHTLOG_ALLOW_HTTP") {
        config.allow_http = matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    if let Ok(value) = env::var("FLIGHTLOG_ALLOW_INSECURE") {
        config.allow_insecure = matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    if let Ok(value) = env::var("FLIGHTLOG_LOG_ENABLED") {
        config.log_enabled = matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    if let Ok(value) = env::var("FLIGHTLOG_LOG_LEVEL") {
        config.log_level = value;
    }
    if let Ok(value) = env::var("FLIGHTLOG_LOG_FILE") {
        config.log_file = value;
    }

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                iter.next();
            }
            "--base-url" => {
                config.base_url = iter
                    .next()
                    .ok_or_else(|| anyhow!("--base-url needs a value"))?
                    .to_string();
            }
            "--metric-units" => {
                config.metric_units = iter
                    .next()
                    .ok_or_else(|| anyhow!("--metric-units needs a value"))?
                    .to_string();
            }
            "--imperial" => {
                config.metric_units = "false".to_string();
            }
            "--metric" => {
                config.metric_units = "true".to_string();
            }
            "--timeout" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--timeout needs a value"))?;
                let secs: u64 = value.parse()?;
                config.timeout_secs = secs.max(1);
            }
            "--insecure" => {
                config.insecure = true;
            }
            "--allow-http" => {
                config.allow_http = true;
            }
            "--allow-insecure" => {
                config.allow_insecure = true;
            }
            "--log" => {
                config.log_enabled = true;
            }
            "--no-log" => {
                config.log_enabled = false;
            }
            "--log-level" => {
                config.log_level = iter
                    .next()
                    .ok_or_else(|| anyhow!("--log-level needs a value"))?
                    .to_string();
            }
            "--log-file" => {
                config.log_file = iter
                    .next()
                    .ok_or_else(|| anyhow!("--log-file needs a value"))?
                    .to_string();
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                print_help();
                return Err(anyhow!("Unknown argument: {other}"));
            }
        }
    }

    validate_security(&config)?;
    Ok(config)
}

fn load_file_config(path: &Path) -> Result<Option<FileConfig>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let cfg: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(Some(cfg))
}

fn apply_file_config(target: &mut Config, file: FileConfig) {
    if let Some(base_url) = file.base_url {
        target.base_url = base_url;
    }
    if let Some(metric_units) = file.metric_units {
        target.metric_units = metric_units;
    }
    if let Some(timeout_secs) = file.timeout_secs {
        target.timeout_secs = timeout_secs.max(1);
    }
    if let Some(insecure) = file.insecure {
        target.insecure = insecure;
    }
    if let Some(allow_http) = file.allow_http {
        target.allow_http = allow_http;
    }
    if let Some(allow_insecure) = file.allow_insecure {
        target.allow_insecure = allow_insecure;
    }
    if let Some(log_enabled) = file.log_enabled {
        target.log_enabled = log_enabled;
    }
    if let Some(log_level) = file.log_level {
        target.log_level = log_level;
    }
    if let Some(log_file) = file.log_file {
        target.log_file = log_file;
    }
}

fn print_help() {
    println!("flightlog-tui");
    println!("Usage: flightlog-tui [--base-url URL] [--config PATH]");
    println!("       [--metric-units VALUE] [--metric] [--imperial]");
    println!("       [--timeout SECONDS] [--insecure] [--allow-http] [--allow-insecure]");
    println!("       [--log] [--no-log] [--log-level LEVEL] [--log-file PATH]");
    println!("Environment: FLIGHTLOG_BASE_URL overrides the API base URL");
    println!("Environment: FLIGHTLOG_CONFIG overrides config path");
    println!("Environment: FLIGHTLOG_METRIC_UNITS sets the units preference (\"false\" = miles)");
    println!("Environment: FLIGHTLOG_TIMEOUT sets the request timeout in seconds");
    println!("Environment: FLIGHTLOG_INSECURE=1 enables invalid TLS certs");
    println!("Environment: FLIGHTLOG_ALLOW_HTTP=1 allows http:// URLs");
    println!("Environment: FLIGHTLOG_ALLOW_INSECURE=1 allows --insecure");
    println!("Environment: FLIGHTLOG_LOG_ENABLED/LEVEL/FILE configure logging");
    println!("Keys: q quit | up/down move | enter open flight | / filters | r retry");
    println!("      e edit | d delete | esc back | ctrl-s save while editing");
}

fn validate_security(config: &Config) -> Result<()> {
    let trimmed = config.base_url.trim();
    if trimmed.to_ascii_lowercase().starts_with("http://") && !config.allow_http {
        return Err(anyhow!(
            "Refusing insecure http URL (set allow_http=true or FLIGHTLOG_ALLOW_HTTP=1 to override)"
        ));
    }
    if config.insecure && !config.allow_insecure {
        return Err(anyhow!(
            "Refusing --insecure without explicit allow_insecure=true or FLIGHTLOG_ALLOW_INSECURE=1"
        ));
    }
    Ok(())
}
