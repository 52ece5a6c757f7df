use dotenvy::dotenv;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "seed", event = "seed_failed", error = %e, "seeding failed");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load()?;
    let store = service::storage::open_store(&cfg.storage).await?;
    let report = service::seed::seed(
        store.as_ref(),
        &cfg.storage.students_collection,
        &cfg.storage.interactions_collection,
    )
    .await?;
    info!(
        service = "seed",
        event = "done",
        students = report.students,
        interactions = report.interactions,
        "mock data loaded"
    );
    Ok(())
}
