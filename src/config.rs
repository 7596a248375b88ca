use std::env;

/// Runtime configuration, read from the environment (optionally via a `.env`
/// file loaded by the binary).
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    pub database_uri: String,
    pub database_name: String,
    pub seed: bool,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_uri: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "social_booster".to_string()),
            seed: env::var("SEED").map(|v| v == "1" || v == "true").unwrap_or(false),
        }
    }
}
