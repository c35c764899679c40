use clap::Parser;
use reflex_experiment::{ControllerConfig, DEFAULT_EXPORT_FILE, ExportOptions};
use std::path::PathBuf;

/// Measure visual reaction time with a randomized color-change stimulus
#[derive(Parser, Debug)]
#[command(name = "reflex", version, about)]
pub struct Cli {
    /// File the results are exported to
    #[arg(long, short, default_value = DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,

    /// Shortest delay before the stimulus, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub min_delay_ms: u64,

    /// Longest delay before the stimulus, in milliseconds
    #[arg(long, default_value_t = 6000)]
    pub max_delay_ms: u64,

    /// Pretty-print the exported JSON
    #[arg(long)]
    pub pretty: bool,

    /// Run in a window instead of borderless fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig::with_delay_range_ms(self.min_delay_ms, self.max_delay_ms)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            pretty: self.pretty,
        }
    }
}
