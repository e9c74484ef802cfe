use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Snapshot file. `None` keeps everything in memory only.
    pub data_file: Option<PathBuf>,
    /// Flush interval for the snapshot job, in seconds.
    pub snapshot_interval_secs: u64,
    /// Where uploaded spec documents are written.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Browser origin allowed to call the API with credentials.
    pub dashboard_origin: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3001,
            data_file: None,
            snapshot_interval_secs: 30,
            upload_dir: PathBuf::from("./uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
            dashboard_origin: "http://localhost:3000".into(),
            log_format: LogFormat::Text,
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let defaults = Config::default();

    let log_format = match std::env::var("AVALON_LOG_FORMAT")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "" | "text" => LogFormat::Text,
        "json" => LogFormat::Json,
        other => anyhow::bail!("invalid AVALON_LOG_FORMAT: {}. Must be 'text' or 'json'", other),
    };

    Ok(Config {
        port: std::env::var("AVALON_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port),
        data_file: std::env::var("AVALON_DATA_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from),
        snapshot_interval_secs: std::env::var("AVALON_SNAPSHOT_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.snapshot_interval_secs),
        upload_dir: std::env::var("AVALON_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir),
        max_upload_bytes: std::env::var("AVALON_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_upload_bytes),
        dashboard_origin: std::env::var("DASHBOARD_ORIGIN")
            .unwrap_or(defaults.dashboard_origin),
        log_format,
    })
}
