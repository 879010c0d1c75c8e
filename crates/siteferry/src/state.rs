use std::sync::Arc;
use std::time::Duration;

use siteferry_api::HttpPagesApi;

use crate::config::Config;
use crate::limit::RateLimiter;
use crate::session::SessionStore;

/// Shared per-process state, constructed once at startup. Only the
/// session and limiter maps mutate after init.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: Arc<HttpPagesApi>,
    pub sessions: Arc<SessionStore>,
    pub login_limiter: Arc<RateLimiter>,
    pub upload_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api = HttpPagesApi::new(
            config.api_base_url.as_str(),
            config.account_id.as_str(),
            config.api_token.as_str(),
        )?;
        // Init order: the resolved secret exists before the store.
        let sessions = SessionStore::new(config.session_secret.clone());

        Ok(Self {
            config: Arc::new(config),
            api: Arc::new(api),
            sessions: Arc::new(sessions),
            login_limiter: Arc::new(RateLimiter::new(5, Duration::from_secs(15 * 60))),
            upload_limiter: Arc::new(RateLimiter::new(10, Duration::from_secs(60 * 60))),
        })
    }
}
