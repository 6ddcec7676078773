mod app;
mod config;
mod db;
mod extractors;
mod health;
mod products;
mod state;
mod telemetry;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load();
    telemetry::init_tracing(&config);

    tracing::info!(
        mode = %config.server.mode,
        port = config.server.port,
        database = %config.database.redacted(),
        "starting product service"
    );

    let db = db::connect(&config.database).await?;
    let app = app::build_app(AppState::new(db));

    app::serve(app, &config.server).await
}
