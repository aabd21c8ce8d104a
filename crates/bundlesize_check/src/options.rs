use clap::Parser;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  bundlesize
  bundlesize --init
  bundlesize --watch
  bundlesize --json
  bundlesize --config custom-config.json";

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "bundlesize", version)]
#[command(about = "Track and enforce bundle size limits", long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Options {
    /// Create a default .bundlesizerc.json config file
    #[arg(long)]
    pub init: bool,

    /// Watch for file changes and re-check automatically
    #[arg(long)]
    pub watch: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Specify a custom config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
