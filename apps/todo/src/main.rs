use clap::Parser;
use core_config::tracing::install_color_eyre;
use todo_server::cli::{Cli, execute};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    execute(cli.command).await
}
