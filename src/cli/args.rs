use clap::{Parser, Subcommand};

/// Countdown dashboard shell
#[derive(Parser)]
#[command(name = "countdown-dash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ~/.countdown-dash/config.json)
    #[arg(short = 'c', long, global = true, env = "COUNTDOWN_DASH_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Boot the dashboard and report its state
    Run {
        /// Initial location hash, e.g. "#/news"
        #[arg(short, long, default_value = "")]
        route: String,

        /// Further hashes to navigate to after startup, in order
        #[arg(short, long)]
        navigate: Vec<String>,

        /// Template directory or http(s) base URL (defaults to built-in fragments)
        #[arg(short, long)]
        templates: Option<String>,

        /// Behave as if opened from local files: views skip fetching templates
        #[arg(long)]
        local: bool,

        /// Start without a loading overlay
        #[arg(long)]
        no_overlay: bool,

        /// Announce views one by one with this delay, to exercise registration retries
        #[arg(long, default_value_t = 0)]
        stagger_ms: u64,

        /// Reload the active view before reporting
        #[arg(long)]
        reload: bool,

        /// Print the active view's rendered content
        #[arg(long)]
        show_html: bool,
    },
    /// List configured routes
    Routes,
    /// Print the effective configuration as JSON
    Config,
}
