use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Result;

use timekeeping::database::{
    init_database,
    repositories::{AttendanceRepository, EmployeeRepository, ScheduleRepository},
};
use timekeeping::middleware::RequestIdMiddleware;
use timekeeping::services::BroadcastNotifier;
use timekeeping::{AppState, Config};

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    log::info!("Starting timekeeping API server");

    // Load configuration (reads .env first)
    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {}, time zone: {})",
        config.environment,
        config.time_zone
    );

    let pool = init_database(&config.database_url).await?;

    let state = AppState::new(
        &config,
        Arc::new(EmployeeRepository::new(pool.clone())),
        Arc::new(ScheduleRepository::new(pool.clone())),
        Arc::new(AttendanceRepository::new(pool)),
        Arc::new(BroadcastNotifier::default()),
    );

    let server_address = config.server_address();
    let allowed_origin = config.client_base_url.clone();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allowed_origin(&allowed_origin)
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(|cfg| state.configure(cfg))
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
