use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// When absent the service runs against the in-memory store and provider.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// The single address allowed to hold the admin role.
    pub admin_email: String,
    pub session_ttl_hours: i64,
    pub organization_name: String,
    pub whatsapp_country_code: String,
    pub log_format: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            jwt_secret: get_env("JWT_SECRET")?,
            admin_email: get_env("ADMIN_EMAIL")?,
            session_ttl_hours: get_env_parse_or("SESSION_TTL_HOURS", 24)?,
            organization_name: env::var("ORGANIZATION_NAME")
                .unwrap_or_else(|_| "ManaCLG LevelUp".to_string()),
            whatsapp_country_code: env::var("WHATSAPP_COUNTRY_CODE")
                .unwrap_or_else(|_| "91".to_string()),
            log_format: env::var("LOG_FORMAT").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_when_unset() {
        env::remove_var("REFERRAL_TEST_UNSET_TTL");
        let ttl: i64 = get_env_parse_or("REFERRAL_TEST_UNSET_TTL", 24).unwrap();
        assert_eq!(ttl, 24);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        env::set_var("REFERRAL_TEST_BAD_TTL", "soon");
        let err = get_env_parse_or::<i64>("REFERRAL_TEST_BAD_TTL", 24).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("REFERRAL_TEST_BAD_TTL")));
    }
}
