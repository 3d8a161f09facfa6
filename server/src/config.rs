use clap::Parser;

/// Proxy configuration, from flags or environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "scrollnote-server", about = "ScrollNote API proxy", version)]
pub struct ServerConfig {
    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Bind address (use 0.0.0.0 behind a reverse proxy)
    #[arg(long, env = "SCROLLNOTE_BIND", default_value = "127.0.0.1")]
    pub bind_address: String,

    /// Provider project base URL, e.g. https://xyzcompany.supabase.co
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: String,

    /// Provider anon API key (sent with every forwarded call)
    #[arg(long, env = "SUPABASE_ANON_KEY")]
    pub supabase_anon_key: String,

    /// Comma-separated CORS origin allow-list. Unset = relaxed mode
    /// (mirror any origin).
    #[arg(long, env = "ALLOWED_ORIGINS")]
    pub allowed_origins: Option<String>,

    /// Rate-limit window in seconds (per IP, all routes)
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 900)]
    pub rate_limit_window_secs: u64,

    /// Requests allowed per IP per window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = 100)]
    pub rate_limit_max: u32,

    /// Include failure detail in 500 responses (development only)
    #[arg(long, env = "SCROLLNOTE_EXPOSE_ERRORS", default_value_t = false)]
    pub expose_errors: bool,

    /// Log filter (e.g. info, scrollnote_server=debug)
    #[arg(long, env = "SCROLLNOTE_LOG")]
    pub log: Option<String>,
}

impl ServerConfig {
    /// The parsed allow-list, or None for the relaxed configuration.
    pub fn origin_list(&self) -> Option<Vec<String>> {
        let raw = self.allowed_origins.as_deref()?;
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if origins.is_empty() {
            None
        } else {
            Some(origins)
        }
    }
}

#[cfg(test)]
impl ServerConfig {
    pub fn for_tests() -> Self {
        ServerConfig {
            port: 0,
            bind_address: "127.0.0.1".to_string(),
            supabase_url: "https://proj.supabase.co".to_string(),
            supabase_anon_key: "anon".to_string(),
            allowed_origins: None,
            rate_limit_window_secs: 900,
            rate_limit_max: 100,
            expose_errors: false,
            log: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_list_parsing() {
        let mut config = ServerConfig::for_tests();
        assert_eq!(config.origin_list(), None);

        config.allowed_origins = Some("http://localhost:3000, chrome-extension://abc".to_string());
        assert_eq!(
            config.origin_list(),
            Some(vec![
                "http://localhost:3000".to_string(),
                "chrome-extension://abc".to_string()
            ])
        );

        config.allowed_origins = Some(" , ".to_string());
        assert_eq!(config.origin_list(), None);
    }
}
