mod cli;
mod context;
mod models;
mod services;
mod store;

use cli::cli;
use services::shared::logger::init_logger;

async fn run_etfwatch() -> anyhow::Result<()> {
    init_logger();
    cli().await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    run_etfwatch().await?;
    Ok(())
}
