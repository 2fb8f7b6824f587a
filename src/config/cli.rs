use crate::config::AppConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "grocery-route")]
#[command(about = "Grocery catalog service with shopping-route ordering")]
pub struct CliArgs {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Override the listen address")]
    pub bind: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Print a bcrypt hash for auth.admin_password_hash
    HashPassword {
        password: String,
        /// bcrypt work factor (4-31)
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },
    /// Order items from a JSON catalog file into a shopping route
    Route {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

impl CliArgs {
    /// File (if any), then environment, then command-line flags.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_env()?;

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.json_logs {
            config.logging.format = crate::config::LogFormat::Json;
        }
        Ok(config)
    }
}
