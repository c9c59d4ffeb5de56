// CLI module for review-translator
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;

/// review-translator - Turns bad reviews into what the user really means and what the boss hears
#[derive(Parser, Debug)]
#[command(name = "review-translator", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.review-translator/config.toml, optional)
    #[arg(short, long, env = "REVIEW_TRANSLATOR_CONFIG")]
    pub config: Option<String>,

    /// Override the bind address from the config
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port from the config
    #[arg(short, long)]
    pub port: Option<u16>,
}
