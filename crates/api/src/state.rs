use chrono::Duration;
use maxxzone_auth::SessionTokens;
use maxxzone_config::AppConfig;
use sqlx::SqlitePool;

use crate::mailer::Mailer;

/// Shared per-process state: the database pool, the session token codec, and
/// the optional SMTP mailer. Cheap to clone; handed to every request.
#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    tokens: SessionTokens,
    mailer: Option<Mailer>,
    reset_code_ttl: Duration,
    allowed_origins: Vec<String>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        tokens: SessionTokens,
        mailer: Option<Mailer>,
        config: &AppConfig,
    ) -> Self {
        let reset_code_ttl =
            Duration::seconds(config.auth.reset_code_ttl_seconds.min(i64::MAX as u64) as i64);

        Self {
            pool,
            tokens,
            mailer,
            reset_code_ttl,
            allowed_origins: config.cors.allowed_origins.clone(),
        }
    }

    pub fn db_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }

    pub fn mailer(&self) -> Option<&Mailer> {
        self.mailer.as_ref()
    }

    pub fn reset_code_ttl(&self) -> Duration {
        self.reset_code_ttl
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}
