use blog_api::config::Config;
use blog_api::{create_rocket, db, telemetry};

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    telemetry::init(&config);

    let conn = db::open(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "database ready");

    match create_rocket(conn).launch().await {
        Ok(_) => {
            tracing::info!("server stopped");
            Ok(())
        }
        Err(e) => {
            let msg = e.to_string();
            tracing::error!(error = %msg, "server failed");
            Err(msg.into())
        }
    }
}
