use anyhow::{bail, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub username: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service runs on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Keys registered at startup, from `API_TOKENS=alice:key1,bob:key2`.
    pub api_tokens: Vec<TokenGrant>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            api_tokens: parse_token_grants(&std::env::var("API_TOKENS").unwrap_or_default())
                .context("API_TOKENS must be a comma-separated list of username:key")?,
        })
    }
}

pub fn parse_token_grants(raw: &str) -> anyhow::Result<Vec<TokenGrant>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let Some((username, key)) = entry.split_once(':') else {
                bail!("missing ':' in {:?}", entry);
            };
            let (username, key) = (username.trim(), key.trim());
            if username.is_empty() || key.is_empty() || key.contains(char::is_whitespace) {
                bail!("invalid token entry {:?}", entry);
            }
            Ok(TokenGrant {
                username: username.to_string(),
                key: key.to_string(),
            })
        })
        .collect()
}
