use clap::Parser;
use dauc_cli::{
    cli::{Cli, Commands},
    config::DaucConfig,
};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = DaucConfig::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Uc { command } => commands::uc::handle(command, &config),
        Commands::Socp { command } => commands::socp::handle(command, &config),
    }
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
    }

    info!("dauc {}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run(&cli) {
        error!("{err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
