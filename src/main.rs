use axum::{
    routing::{get, post},
    Router,
};
use screening_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    {
        let state = app_state.clone();
        let tick = Duration::from_secs(config.screening_interval_secs);
        tokio::spawn(async move {
            info!(
                "Starting AI resume screening worker (every {:?})",
                tick
            );
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                match state.screening_service.run_once().await {
                    Ok(0) => {}
                    Ok(n) => info!("Screening pass finished, {} applications processed", n),
                    Err(e) => tracing::error!(error = ?e, "Resume screening pass failed"),
                }
            }
        });
    }

    let api = Router::new()
        .route("/api/listings/new", post(routes::listing::create_listing))
        .route("/api/listings", post(routes::listing::list_listings))
        .route("/api/listings/getbyid", post(routes::listing::get_listing))
        .route("/api/listings/edit", post(routes::listing::edit_listing))
        .route("/api/listings/apply", post(routes::applicant::apply))
        .route("/api/applicants/list", post(routes::applicant::list_applicants))
        .route("/api/applicants/check", post(routes::applicant::check_resume))
        .route("/api/stats", post(routes::stats::dashboard_stats))
        .layer(axum::middleware::from_fn_with_state(
            screening_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            screening_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = Router::new()
        .route("/health", get(routes::health::health))
        .merge(api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
