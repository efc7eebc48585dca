use clap::Parser;
use docsense_cli::{Cli, commands, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json);
    commands::run(cli).await
}
