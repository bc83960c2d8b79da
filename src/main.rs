use agriplan::api::{run_web_server, AppState};
use agriplan::config::{run_options::get_args, Config};
use agriplan::error::AppError;
use agriplan::planner::coefficients::CoefficientTable;
use agriplan::store::MemoryPlanStore;
use agriplan::time::RealTimeProvider;
use agriplan::utils::start_log;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    start_log::<RealTimeProvider>(None);

    info!("Starting application...");
    let cfg = Config::load(&get_args())?;

    let coefficients = match &cfg.planner.coefficients_file {
        Some(path) => CoefficientTable::load(path)?,
        None => {
            info!("No coefficients file configured, using the built-in table.");
            CoefficientTable::default()
        }
    };
    let addr = cfg.web_server.socket_addr()?;

    let app_state = AppState::new(
        Arc::new(coefficients),
        Arc::new(MemoryPlanStore::new()),
        Arc::new(RealTimeProvider),
        cfg,
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = ?e, "Unable to listen for shutdown signal.");
            std::future::pending::<()>().await;
        }
        _ = shutdown_tx.send(true);
    });

    run_web_server(app_state, addr, shutdown_rx).await
}
