//! ghas-report - GitHub Advanced Security status report across organizations

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod notify;
mod output;
mod pipeline;
mod report;
mod vault;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `warn` by default, `debug` for this crate with `--debug`; `RUST_LOG` wins
fn init_logging(debug: bool) {
    let default_filter = if debug {
        concat!("warn,", env!("CARGO_CRATE_NAME"), "=debug")
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Report { output, no_email } => {
            cli::report::run(&opts, output.as_deref(), no_email).await
        }
        Commands::Scan { format } => cli::scan::run(&opts, format).await,
        Commands::Provision(ref args) => cli::provision::run(&opts, args).await,
        Commands::Version => {
            println!("ghas-report version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => cli::completions::run(shell),
    }
}
