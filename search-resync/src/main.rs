use search_resync::{logging, ResyncConfig, ResyncError};
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ResyncError> {
    dotenv::dotenv().ok();
    logging::init();

    let result = match ResyncConfig::from_env() {
        Ok(config) => search_resync::run(&config).await.map(|_| ()),
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        error!(error = %e, "Resync aborted");
    }
    result
}
