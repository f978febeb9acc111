use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_UI_LANG, LOCALE_DIR, MAX_FILE_SIZE,
    MAX_META_SIZE,
};
use clap::{Arg, Command};
use std::path::PathBuf;
use storage::{DEFAULT_EXISTBACK_YEARS, DEFAULT_LOOKBACK_YEARS};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Document archive root directory
    pub data_dir: PathBuf,
    /// Translation catalog directory
    pub locale_dir: PathBuf,
    /// Backward-search depth for document retrieval
    pub lookback_years: usize,
    /// Backward-search depth for existence probes
    pub existback_years: usize,
    /// Response-message language when the client states no preference
    pub ui_language: String,
    /// Largest accepted document payload
    pub max_file_size: usize,
    /// Largest accepted metadata document
    pub max_meta_size: usize,
}

impl ServerConfig {
    pub fn load() -> Result<Self, std::io::Error> {
        let matches = Command::new("server")
            .arg(
                Arg::new("data-dir")
                    .long("data-dir")
                    .value_name("DIR")
                    .help("Document archive root directory")
                    .default_value(DEFAULT_DATA_DIR),
            )
            .arg(
                Arg::new("locale-dir")
                    .long("locale-dir")
                    .value_name("DIR")
                    .help("Translation catalog directory")
                    .default_value(LOCALE_DIR),
            )
            .arg(
                Arg::new("lookback-years")
                    .long("lookback-years")
                    .value_name("N")
                    .help("Backward-search depth for document retrieval (1-1000)"),
            )
            .arg(
                Arg::new("existback-years")
                    .long("existback-years")
                    .value_name("N")
                    .help("Backward-search depth for existence probes (1-1000)"),
            )
            .arg(
                Arg::new("ui-language")
                    .long("ui-language")
                    .value_name("LANG")
                    .help("Response-message language, e.g. 'en' or 'zh-CN'"),
            )
            .arg(
                Arg::new("port")
                    .long("port")
                    .value_name("PORT")
                    .help("Server port (default: 8080, or SERVER_PORT env var)"),
            )
            .arg(
                Arg::new("host")
                    .long("host")
                    .value_name("HOST")
                    .help("Server host (default: 0.0.0.0, or SERVER_HOST env var)"),
            )
            .get_matches();

        let data_dir = PathBuf::from(
            matches
                .get_one::<String>("data-dir")
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_DATA_DIR),
        );
        let locale_dir = PathBuf::from(
            matches
                .get_one::<String>("locale-dir")
                .map(|s| s.as_str())
                .unwrap_or(LOCALE_DIR),
        );

        let lookback_years = parse_depth(matches.get_one::<String>("lookback-years"), DEFAULT_LOOKBACK_YEARS)?;
        let existback_years = parse_depth(matches.get_one::<String>("existback-years"), DEFAULT_EXISTBACK_YEARS)?;

        let ui_language = matches
            .get_one::<String>("ui-language")
            .cloned()
            .or_else(|| detect_language())
            .unwrap_or_else(|| DEFAULT_UI_LANG.to_string());

        // Priority: command-line args > environment variables > defaults
        let env_host = std::env::var("SERVER_HOST").ok();
        let env_port = std::env::var("SERVER_PORT").ok();

        let host = matches
            .get_one::<String>("host")
            .map(|s| s.as_str())
            .or(env_host.as_deref())
            .unwrap_or(DEFAULT_HOST)
            .to_string();

        let port_str = matches
            .get_one::<String>("port")
            .map(|s| s.as_str())
            .or(env_port.as_deref())
            .unwrap_or(DEFAULT_PORT);

        let port = port_str.parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid port number: {}", port_str),
            )
        })?;

        Ok(ServerConfig {
            host,
            port,
            data_dir,
            locale_dir,
            lookback_years,
            existback_years,
            ui_language,
            max_file_size: MAX_FILE_SIZE,
            max_meta_size: MAX_META_SIZE,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_depth(arg: Option<&String>, default: usize) -> Result<usize, std::io::Error> {
    match arg {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid year depth: {}", s),
            )
        }),
    }
}

/// Pick a UI language from the environment, e.g. "en_US.UTF-8" -> "en-US".
fn detect_language() -> Option<String> {
    let lang = std::env::var("LANG").ok()?;
    let lang = lang.split('.').next()?.trim();
    if lang.is_empty() {
        return None;
    }
    Some(lang.replace('_', "-"))
}
