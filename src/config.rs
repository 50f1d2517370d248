use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub ai_model: String,
    pub screening_interval_secs: u64,
    pub screening_batch_size: i64,
    pub public_rps: u32,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            gemini_api_key: get_env("GEMINI_API_KEY")?,
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/openai/".to_string()
            }),
            ai_model: env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            screening_interval_secs: get_env_parse_or("SCREENING_INTERVAL_SECS", 60)?,
            screening_batch_size: get_env_parse_or("SCREENING_BATCH_SIZE", 10)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 50)?,
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
