use sitecraft_server::config::AppConfig;
use sitecraft_server::observability;
use sitecraft_server::server::{self, ServerError};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = AppConfig::load()?;
    observability::init(&config.server);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    server::run(config).await.inspect_err(|e| {
        tracing::error!(error = %e, "Server failed");
    })
}
