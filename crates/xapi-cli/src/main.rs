//! `xapi`: check, reformat and inspect X-API dataset documents.

use clap::Parser;
use tracing::debug;
use xapi_cli::{CliConfig, commands, init_logging};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let options = config.options();
    debug!(
        xmlns = %options.version.xmlns,
        parse_to_types = options.parse_to_types,
        layout = %options.dataset_layout,
        "Starting xapi"
    );

    commands::run(&config.command, &options, std::io::stdout().lock())
}
