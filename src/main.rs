use std::io;
use std::process::ExitCode;

use oracle_username_probe::cli::{self, Command, EXIT_FATAL, EXIT_USAGE, USAGE};
use oracle_username_probe::{Probe, ProbeConfig, ThinConnector};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = match cli::parse(std::env::args_os()) {
        Command::Run(args) => args,
        Command::Usage => {
            println!("{}", USAGE);
            return ExitCode::from(EXIT_USAGE);
        }
        Command::Info(e) => e.exit(),
    };

    let admin = match args.credentials() {
        Ok(admin) => admin,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    let mut probe = Probe::new(ThinConnector, ProbeConfig::new(admin), io::stdout().lock());
    match probe.run().await {
        Ok(outcome) => {
            info!(?outcome, "probe finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
