use clap::Parser;

use crate::life::rules::RuleVariant;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "noisylife.toml")]
    pub config: String,

    /// Output CSV path
    #[arg(long, default_value = "results.csv")]
    pub out: String,

    /// Rule variant (overrides config)
    #[arg(long, value_enum)]
    pub rule: Option<RuleVariant>,

    /// Base rng seed (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Comma-separated seed pattern ids (overrides config)
    #[arg(long, value_delimiter = ',')]
    pub patterns: Option<Vec<u16>>,
}
