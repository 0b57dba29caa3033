use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Origin used to build `{origin}/p/{token}` share links.
    pub public_origin: String,
    /// Postgres URL. `None` runs the server on the in-memory store.
    pub database_url: Option<String>,
    /// Object-storage public URL base.
    pub storage_public_url: String,
    /// Bucket holding library images.
    pub storage_bucket: String,
    /// Autosave debounce quiet period in milliseconds (default: `1000`).
    pub autosave_quiet_ms: u64,
    pub textgen: TextGenConfig,
}

/// Text-completion endpoint settings.
#[derive(Debug, Clone)]
pub struct TextGenConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                          |
    /// |------------------------|--------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                        |
    /// | `PORT`                 | `3000`                                           |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                          |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                             |
    /// | `PUBLIC_ORIGIN`        | `http://localhost:5173`                          |
    /// | `DATABASE_URL`         | unset                                            |
    /// | `STORAGE_PUBLIC_URL`   | `http://localhost:54321/storage/v1/object/public`|
    /// | `STORAGE_BUCKET`       | `images`                                         |
    /// | `AUTOSAVE_QUIET_MS`    | `1000`                                           |
    /// | `TEXTGEN_API_URL`      | `https://api.openai.com/v1/chat/completions`     |
    /// | `TEXTGEN_API_KEY`      | unset                                            |
    /// | `TEXTGEN_MODEL`        | `gpt-4o-mini`                                    |
    ///
    /// Panics on unparsable numbers so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_origin = std::env::var("PUBLIC_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let database_url = non_empty_var("DATABASE_URL");

        let storage_public_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:54321/storage/v1/object/public".into());
        let storage_bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "images".into());

        let autosave_quiet_ms: u64 = std::env::var("AUTOSAVE_QUIET_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("AUTOSAVE_QUIET_MS must be a valid u64");

        let textgen = TextGenConfig {
            api_url: std::env::var("TEXTGEN_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".into()),
            api_key: non_empty_var("TEXTGEN_API_KEY"),
            model: std::env::var("TEXTGEN_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_origin,
            database_url,
            storage_public_url,
            storage_bucket,
            autosave_quiet_ms,
            textgen,
        }
    }

    pub fn autosave_quiet(&self) -> Duration {
        Duration::from_millis(self.autosave_quiet_ms)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
