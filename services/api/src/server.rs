use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryComplaintStore};
use crate::routes::with_service_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use complaint_desk::config::AppConfig;
use complaint_desk::error::AppError;
use complaint_desk::telemetry;
use complaint_desk::workflows::complaints::{
    complaint_router, ComplaintDeskService, ComplaintStore, HttpComplaintStore,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

fn complaints_for<S>(store: S) -> Router
where
    S: ComplaintStore + 'static,
{
    complaint_router(Arc::new(ComplaintDeskService::new(Arc::new(store))))
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(store_url) = args.store_url.take() {
        config.store = config.store.with_base_url(store_url)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let complaints = if args.in_memory {
        info!("serving complaints from the in-memory store");
        complaints_for(InMemoryComplaintStore::default())
    } else {
        let store = HttpComplaintStore::new(&config.store)?;
        info!(store_url = store.base_url(), "serving complaints from the remote store");
        complaints_for(store)
    };

    let app = with_service_routes(complaints)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "complaint desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
