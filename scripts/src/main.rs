use clap::Parser;
use scripts::{cli::Cli, errors::ScriptError};
use tracing::{error, Level};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli { verbose, command } = Cli::parse();

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().pretty().with_max_level(level).init();

    command.run().await.inspect_err(|e| {
        error!(fatal = e.is_fatal(), "{e}");
        if let Some(vault) = e.orphaned_vault() {
            error!(vault = %vault, "vault left without a strategy, manual cleanup required");
        }
    })
}
