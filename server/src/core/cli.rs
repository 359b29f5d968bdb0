use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_ACCESS_TOKEN_SECRET, ENV_CONFIG, ENV_CORS_ORIGIN, ENV_DEBUG, ENV_HOST,
    ENV_MAX_UPLOAD_BYTES, ENV_PORT, ENV_PUBLIC_URL, ENV_REFRESH_TOKEN_SECRET,
};

#[derive(Parser)]
#[command(name = "vidhive")]
#[command(version, about = "Video sharing platform backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Secret used to sign access tokens (random per process when unset)
    #[arg(long, global = true, env = ENV_ACCESS_TOKEN_SECRET, hide_env_values = true)]
    pub access_token_secret: Option<String>,

    /// Secret used to sign refresh tokens (random per process when unset)
    #[arg(long, global = true, env = ENV_REFRESH_TOKEN_SECRET, hide_env_values = true)]
    pub refresh_token_secret: Option<String>,

    /// Allowed CORS origin (repeat or comma-separate for several)
    #[arg(long, global = true, env = ENV_CORS_ORIGIN, value_delimiter = ',')]
    pub cors_origin: Vec<String>,

    /// Maximum request body size in bytes (media uploads)
    #[arg(long, global = true, env = ENV_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: Option<usize>,

    /// Public base URL used when building media links
    #[arg(long, global = true, env = ENV_PUBLIC_URL)]
    pub public_url: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Delete local data directory (database and media). Requires confirmation.
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub access_token_secret: Option<String>,
    pub refresh_token_secret: Option<String>,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: Option<usize>,
    pub public_url: Option<String>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            debug: cli.debug,
            config: cli.config,
            access_token_secret: cli.access_token_secret,
            refresh_token_secret: cli.refresh_token_secret,
            cors_origins: cli
                .cors_origin
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            max_upload_bytes: cli.max_upload_bytes,
            public_url: cli.public_url,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (CliConfig::from(cli), command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "vidhive",
            "-H",
            "0.0.0.0",
            "-p",
            "9000",
            "--cors-origin",
            "http://a.test, http://b.test",
            "--max-upload-bytes",
            "1024",
        ])
        .unwrap();
        let config = CliConfig::from(cli);
        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.max_upload_bytes, Some(1024));
    }

    #[test]
    fn test_prune_subcommand() {
        let cli = Cli::try_parse_from(["vidhive", "system", "prune", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::System {
                command: SystemCommands::Prune { yes: true }
            })
        ));
    }
}
