//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`init`], or [`validate`].

pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::RelayError;

pub async fn dispatch(cli: Cli) -> Result<(), RelayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  cors-relay v{version} - HTTP forwarding proxy with permissive CORS\n\n  \
         No command provided. To get started:\n\n    \
         cors-relay run                    Start the proxy on :8080\n    \
         cors-relay init                   Generate a starter config.json\n    \
         cors-relay --help                 See all commands and options\n"
    );
}
