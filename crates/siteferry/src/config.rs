use std::path::{Path, PathBuf};
use std::{env, fs, io};

use rand::RngCore;

/// File a generated session secret persists in, so sessions survive
/// restarts when no explicit secret is configured.
const SECRET_FILE: &str = ".session_secret";

const DEFAULT_API_URL: &str = "https://api.cloudflare.com/client/v4";

const DEFAULT_PORT: u16 = 8002;

/// Upstream cap on one uploaded archive. Bounds the decompressed work
/// the pipeline takes on and keeps the single-request asset batch
/// within platform limits.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("failed to prepare uploads directory: {0}")]
    Uploads(#[source] io::Error),
}

/// Process-wide configuration, read once at startup and never mutated
/// afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub api_token: String,
    pub account_id: String,
    pub auth_user: String,
    pub auth_pass: String,
    pub uploads_dir: PathBuf,
    pub session_secret: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: value.clone(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let uploads_dir = env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));
        fs::create_dir_all(&uploads_dir).map_err(ConfigError::Uploads)?;

        let session_secret =
            resolve_session_secret(env::var("SESSION_SECRET").ok(), Path::new("."));

        Ok(Config {
            port,
            api_base_url: env::var("PAGES_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned()),
            api_token: require("PAGES_API_TOKEN")?,
            account_id: require("PAGES_ACCOUNT_ID")?,
            auth_user: require("AUTH_USER")?,
            auth_pass: require("AUTH_PASS")?,
            uploads_dir,
            session_secret,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Resolve the session secret with fixed precedence: explicit value,
/// previously persisted file, freshly generated. A generated secret is
/// persisted best-effort.
fn resolve_session_secret(explicit: Option<String>, state_dir: &Path) -> String {
    if let Some(secret) = explicit.filter(|s| !s.is_empty()) {
        return secret;
    }

    let secret_file = state_dir.join(SECRET_FILE);
    if let Ok(existing) = fs::read_to_string(&secret_file) {
        let existing = existing.trim();
        if !existing.is_empty() {
            return existing.to_owned();
        }
    }

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = hex::encode(bytes);
    if let Err(err) = fs::write(&secret_file, &secret) {
        tracing::warn!(error = %err, "could not persist generated session secret");
    }
    secret
}
