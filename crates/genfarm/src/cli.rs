use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "genfarm")]
#[command(about = "Multi-account automation for the Sogni generation service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the local stores (defaults to CWD)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the multi-account generation loop
    Run {
        /// Override the remote API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Run the hourly reward-claim scheduler
    Claim {
        /// Override the remote API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Append records to the local stores
    Add {
        #[command(subcommand)]
        cmd: AddCommands,
    },

    /// Inspect or update pacing delays
    Delays {
        #[command(subcommand)]
        cmd: DelayCommands,
    },
}

#[derive(Subcommand)]
pub enum AddCommands {
    /// Add one account record (stored as username|password|appId)
    Account {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        app_id: String,
    },

    /// Add claim tokens (comma-separated)
    Tokens {
        /// One or more tokens, separated by commas
        tokens: String,
    },

    /// Add proxy URLs (comma-separated, one per account position)
    Proxies {
        /// One or more proxy URLs, separated by commas
        proxies: String,
    },

    /// Add a custom prompt line
    Prompt {
        /// Prompt text
        text: String,
    },
}

#[derive(Subcommand)]
pub enum DelayCommands {
    /// Print the effective delay configuration
    Show,

    /// Update delay fields (unset fields keep their current values)
    Set {
        /// Minimum wait between iterations, milliseconds
        #[arg(long)]
        min_delay_ms: Option<u64>,

        /// Maximum wait between iterations, milliseconds
        #[arg(long)]
        max_delay_ms: Option<u64>,

        /// Maximum per-account startup jitter, milliseconds
        #[arg(long)]
        initial_delay_max_ms: Option<u64>,
    },
}
