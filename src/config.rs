use anyhow::{Context, Result};
use clap::Parser;
use std::env;

#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "Runs the bookshelf service", long_about = None)]
pub struct Cli {
    /// Port the HTTP listener binds to.
    #[arg(short = 'p', long = "port", default_value_t = 8080)]
    pub port: u16,
}

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "booksdb";
const DEFAULT_DB_PORT: u16 = 5432;

/// Connection settings for the books database. Built once at startup and
/// passed by reference afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_port = match env::var("DB_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("DB_PORT is not a valid port number: {raw}"))?,
            Err(_) => DEFAULT_DB_PORT,
        };

        Ok(Config {
            db_host: env::var("DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.to_string()),
            db_user: env::var("DB_USER").unwrap_or_else(|_| DEFAULT_DB_USER.to_string()),
            db_password: env::var("DB_PASSWORD").unwrap_or_default(),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
            db_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_db_env() {
        for key in ["DB_HOST", "DB_USER", "DB_PASSWORD", "DB_NAME", "DB_PORT"] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_with_clean_env() {
        clear_db_env();

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.db_host, "localhost");
        assert_eq!(cfg.db_user, "postgres");
        assert_eq!(cfg.db_password, "");
        assert_eq!(cfg.db_name, "booksdb");
        assert_eq!(cfg.db_port, 5432);
    }

    #[test]
    #[serial]
    fn env_overrides_apply() {
        clear_db_env();
        unsafe {
            env::set_var("DB_HOST", "db.internal");
            env::set_var("DB_USER", "books");
            env::set_var("DB_PASSWORD", "hunter2");
            env::set_var("DB_NAME", "booksdb_test");
            env::set_var("DB_PORT", "6432");
        }

        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.db_host, "db.internal");
        assert_eq!(cfg.db_user, "books");
        assert_eq!(cfg.db_password, "hunter2");
        assert_eq!(cfg.db_name, "booksdb_test");
        assert_eq!(cfg.db_port, 6432);

        clear_db_env();
    }

    #[test]
    #[serial]
    fn invalid_port_is_an_error() {
        clear_db_env();
        unsafe { env::set_var("DB_PORT", "not-a-port") };

        assert!(Config::from_env().is_err());

        clear_db_env();
    }
}
