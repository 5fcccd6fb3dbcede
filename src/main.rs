use anyhow::Context;
use booktracker_app::App;
use booktracker_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load booktracker settings")?;
    booktracker_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        db = %settings.database.path,
        "booktracker-app bootstrap starting"
    );

    let app = App::build(settings).context("failed to build application")?;
    tracing::info!("booktracker-app bootstrap complete");

    app.run().await
}
