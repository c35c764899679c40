mod app;
mod cli;
mod keymap;
mod session;

use app::App;
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

// The binary's targets are `reflex::*`; the prefix also covers the
// `reflex_*` library crates.
const DEFAULT_FILTER: &str = "reflex=info";
const VERBOSE_FILTER: &str = "reflex=debug";

fn default_directives(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app = App::new(&cli)?;
    app.run()?;

    Ok(())
}
