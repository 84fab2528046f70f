use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

use hrm_attendance::config::Config;
use hrm_attendance::db::init_db;
use hrm_attendance::docs::ApiDoc;
use hrm_attendance::jobs::scheduler;
use hrm_attendance::store::MySqlStore;
use hrm_attendance::{routes, telemetry};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRM attendance service"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let _guard = telemetry::init(&config.log_dir, "app.log", config.log_level)?;

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    let store = MySqlStore::new(pool);

    if config.scheduler_enabled {
        let scheduled_store = store.clone();
        let options = config.job_options(false);
        let at = config.daily_run_at;
        actix_web::rt::spawn(async move {
            scheduler::run_scheduler(scheduled_store, options, at).await;
        });
    } else {
        info!("Daily attendance scheduler disabled");
    }

    let server_addr = config.server_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(store.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
