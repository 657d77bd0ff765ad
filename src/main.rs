use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use taskflow::cli;
use taskflow::cli::commands::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Quiet unless RUST_LOG says otherwise; diagnostics go to stderr so JSON
    // output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let exit_code = match cli_args.command {
        Commands::Login { email, password } => cli::auth::login(email, password, json_output).await,
        Commands::Signup { email, password } => {
            cli::auth::signup(email, password, json_output).await
        }
        Commands::Logout => cli::auth::logout(json_output),
        Commands::Whoami => cli::auth::whoami(json_output).await,
        Commands::Task(cmd) => cli::task::run(cmd, json_output).await,
        Commands::Board { command } => cli::board::run(command, json_output).await,
        Commands::Workspace(cmd) => cli::workspace::run(cmd, json_output).await,
        Commands::Stats => cli::stats::run(json_output).await,
    };

    process::exit(exit_code);
}
