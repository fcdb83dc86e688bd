use std::process::ExitCode;

use clap::Parser;

use file_save_lib::bootstrap::{load_settings, tracing::init_tracing_subscriber};
use file_save_lib::{run, Cli};
use fsa_core::HostError;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.clone())?;
    init_tracing_subscriber(&settings.logging)?;

    match run(cli, &settings).await {
        Ok(handle) => {
            println!("{}", handle.name());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.downcast_ref::<HostError>().is_some_and(HostError::is_aborted) => {
            eprintln!("Save cancelled");
            Ok(ExitCode::from(2))
        }
        Err(err) => Err(err),
    }
}
