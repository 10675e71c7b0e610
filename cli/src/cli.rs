use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line interface for the Hemolog treatment log
#[derive(Debug, Parser)]
#[command(
    name = "hemolog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Review and log infusions and treatments on Hemolog",
    long_about = None
)]
pub struct Cli {
    /// Use this settings file instead of the default location
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List recent infusions and treatments
    Recent {
        /// Only show records whose type contains this text, ignoring case
        #[arg(long = "type", short = 't')]
        record_type: Option<String>,
    },

    /// Log an infusion
    LogInfusion(LogArgs),

    /// Log a treatment
    LogTreatment(LogArgs),

    /// Open Hemolog in the browser
    Open,

    /// Show or change the persisted settings
    Config {
        #[arg(long = "print", help = "Print the current settings (API key masked)")]
        print: bool,

        #[arg(long = "set-api-key", help = "Store the API key used for every request")]
        api_key: Option<String>,

        #[arg(long = "base-url", help = "Store a different service base URL")]
        base_url: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// PROPHY, BLEED, PREVENTATIVE or ANTIBODY (defaults to the form's first choice)
    #[arg(long = "type", short = 't')]
    pub record_type: Option<String>,

    /// Day of the infusion or treatment, YYYY-MM-DD (defaults to today)
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    /// Affected areas, e.g. "Left ankle, right knee"
    #[arg(long, short = 's')]
    pub sites: Option<String>,

    /// What caused it
    #[arg(long, short = 'c')]
    pub cause: Option<String>,
}
