#[macro_use]
extern crate rocket;

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod telemetry;

use rocket::fairing::AdHoc;

pub type DbPool = std::sync::Mutex<rusqlite::Connection>;

/// Extension trait for DbPool to recover from mutex poison
pub trait DbPoolExt {
    fn conn(&self) -> std::sync::MutexGuard<'_, rusqlite::Connection>;
}

impl DbPoolExt for DbPool {
    fn conn(&self) -> std::sync::MutexGuard<'_, rusqlite::Connection> {
        self.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Builds the server around an already-initialized connection. The
/// connection lives as long as the returned instance.
pub fn create_rocket(conn: rusqlite::Connection) -> rocket::Rocket<rocket::Build> {
    let rocket = rocket::build()
        .manage(std::sync::Mutex::new(conn))
        .attach(AdHoc::on_liftoff("Startup log", |rocket| Box::pin(async move {
            let cfg = rocket.config();
            tracing::info!(address = %cfg.address, port = cfg.port, "blog api listening");
        })))
        .attach(AdHoc::on_shutdown("Database release", |_| Box::pin(async {
            tracing::info!("shutting down, releasing database connection");
        })))
        .mount("/", routes![
            routes::health,
            routes::list_posts,
            routes::get_post,
            routes::create_post,
            routes::update_post,
            routes::delete_post,
        ])
        .register("/", catchers![
            routes::bad_request,
            routes::not_found,
            routes::unprocessable_entity,
            routes::internal_error,
        ]);

    match rocket_cors::CorsOptions::default()
        .allowed_origins(rocket_cors::AllowedOrigins::all())
        .to_cors()
    {
        Ok(cors) => rocket.attach(cors),
        Err(e) => {
            tracing::warn!(error = %e, "CORS disabled");
            rocket
        }
    }
}
