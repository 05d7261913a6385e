use std::{env, fmt, path::PathBuf, time::Duration};

use anyhow::Context;

#[derive(Clone)]
pub struct AppConfig {
    /// Postgres connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub admin_password: Option<String>,
    pub static_dir: PathBuf,
    /// Upper bound on any lock wait inside a sale.
    pub sale_lock_timeout: Duration,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL");
        let host = non_empty("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match non_empty("APP_PORT").or_else(|| non_empty("PORT")) {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid port `{p}`"))?,
            None => 3000,
        };
        let admin_password = var("ADMIN_PASSWORD").filter(|v| !v.is_empty());
        let static_dir = non_empty("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"));
        let sale_lock_timeout = match non_empty("SALE_LOCK_TIMEOUT_MS") {
            Some(ms) => {
                let millis = ms
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("invalid SALE_LOCK_TIMEOUT_MS `{ms}`"))?;
                // Postgres reads a lock_timeout of 0 as "wait forever".
                if millis == 0 {
                    anyhow::bail!("SALE_LOCK_TIMEOUT_MS must be at least 1");
                }
                Duration::from_millis(millis)
            }
            None => Duration::from_millis(5000),
        };
        let run_migrations = match non_empty("RUN_MIGRATIONS") {
            Some(flag) => flag
                .trim()
                .parse::<bool>()
                .with_context(|| format!("invalid RUN_MIGRATIONS `{flag}`"))?,
            None => true,
        };

        Ok(Self {
            database_url,
            host,
            port,
            admin_password,
            static_dir,
            sale_lock_timeout,
            run_migrations,
        })
    }
}

// Keeps credentials out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .field("static_dir", &self.static_dir)
            .field("sale_lock_timeout", &self.sale_lock_timeout)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}
