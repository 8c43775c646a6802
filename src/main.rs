use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use std::sync::Arc;

mod api;
mod checkin;
mod config;
mod db;
mod docs;
mod model;
mod routes;
mod store;

use checkin::AdmissionController;
use config::{Config, StoreBackend};
use db::init_db;
use routes::Limiters;
use store::{CheckInStore, MemoryCheckInStore, MySqlCheckInStore};

use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance check-in service"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        store = config.store_backend.as_ref(),
        cooldown_minutes = config.cooldown_minutes,
        cooldown_policy = config.cooldown_policy.as_ref(),
        "Server starting..."
    );

    let store: Arc<dyn CheckInStore> = match (config.store_backend, &config.database_url) {
        (StoreBackend::Mysql, Some(database_url)) => {
            let pool = init_db(database_url, config.db_max_connections).await?;
            Arc::new(MySqlCheckInStore::new(pool))
        }
        (StoreBackend::Mysql, None) => anyhow::bail!("DATABASE_URL must be set"),
        (StoreBackend::Memory, _) => {
            warn!("Using in-memory store, check-ins are lost on restart");
            Arc::new(MemoryCheckInStore::new())
        }
    };

    let controller = AdmissionController::new(
        store,
        config.cooldown(),
        config.student_lock_idle(),
    );
    let limiters = Limiters::from_config(&config)?;

    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();
    let controller = Data::new(controller);
    let openapi = docs::openapi(&api_prefix);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", openapi.clone()),
            )
            .app_data(controller.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix, limiters.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
