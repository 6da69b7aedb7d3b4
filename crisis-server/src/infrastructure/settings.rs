use anyhow::{Context, Result, anyhow};

const MAX_STATS_WINDOW_SIZE: u32 = 1000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_request_timeout_secs: u64,
    pub reliefweb_base_url: String,
    pub reliefweb_appname: String,
    pub reliefweb_timeout_secs: u64,
    pub stats_window_size: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        let jwt_ttl_seconds: i64 = std::env::var("JWT_TTL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 30)?;

        let reliefweb_base_url = std::env::var("RELIEFWEB_BASE_URL")
            .unwrap_or_else(|_| "https://api.reliefweb.int/v1".to_string());
        let reliefweb_appname =
            std::env::var("RELIEFWEB_APPNAME").unwrap_or_else(|_| "CrisisMap".to_string());
        let reliefweb_timeout_secs = parse_u64_env("RELIEFWEB_TIMEOUT_SECS", 15)?;
        ensure_upstream_timeout_fits(reliefweb_timeout_secs, http_request_timeout_secs)?;
        let stats_window_size = parse_window_size(std::env::var("STATS_WINDOW_SIZE").ok())?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_request_timeout_secs,
            reliefweb_base_url,
            reliefweb_appname,
            reliefweb_timeout_secs,
            stats_window_size,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Upstream call must give up before the inbound request timeout fires.
fn ensure_upstream_timeout_fits(upstream_secs: u64, request_secs: u64) -> Result<()> {
    if upstream_secs >= request_secs {
        return Err(anyhow!(
            "RELIEFWEB_TIMEOUT_SECS ({upstream_secs}) must be less than HTTP_REQUEST_TIMEOUT_SECS ({request_secs})"
        ));
    }
    Ok(())
}

fn parse_window_size(raw: Option<String>) -> Result<u32> {
    let value = match raw {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .context("Failed to parse STATS_WINDOW_SIZE, expecting positive integer")?,
        None => 100,
    };

    if value == 0 || value > MAX_STATS_WINDOW_SIZE {
        return Err(anyhow!(
            "STATS_WINDOW_SIZE must be within 1..={MAX_STATS_WINDOW_SIZE}"
        ));
    }
    Ok(value)
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
