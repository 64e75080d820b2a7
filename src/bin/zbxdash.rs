#![forbid(unsafe_code)]

#[path = "zbxdash/app.rs"]
mod app;
#[path = "zbxdash/cli.rs"]
mod cli;

use std::process::ExitCode;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_args();
    Ok(app::run(cli).await?)
}
