//! Herald server binary.

use herald_server::{HeraldConfig, init_observability, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = HeraldConfig::load()?;
    init_observability(config.server().log_level(), *config.server().json_logs())?;

    run(config).await?;
    Ok(())
}
