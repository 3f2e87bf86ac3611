use std::path::PathBuf;

use clap::Parser;

/// Dew todo server.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "DEW_PORT", default_value_t = 7890)]
    pub port: u16,

    /// SQLite database to store todos in.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://dew.db?mode=rwc")]
    pub database_url: String,

    /// Upper bound on pooled database connections.
    #[arg(long, env = "DEW_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// PEM certificate, serves over TLS together with `--key`.
    #[arg(long, env = "SSL_CERT", requires = "key")]
    pub cert: Option<PathBuf>,

    /// PEM private key.
    #[arg(long, env = "SSL_KEY", requires = "cert")]
    pub key: Option<PathBuf>,
}

impl Config {
    pub fn tls(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.cert.as_ref().zip(self.key.as_ref())
    }
}
