use axum::{
    Json, Router,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::{
        HeaderMap, StatusCode,
        header::{AsHeaderName, USER_AGENT},
    },
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use survey_core::SurveySubmission;
use survey_security::{RequestContext, redact};
use survey_storage::RecordLog;

use crate::error::ApiError;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

pub struct SurveyServer {
    pub log: Arc<RecordLog>,
}

#[derive(Clone)]
struct AppState {
    log: Arc<RecordLog>,
}

impl SurveyServer {
    pub fn new(log: Arc<RecordLog>) -> Self {
        Self { log }
    }

    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let app = router(self.log);

        let listener = TcpListener::bind(addr).await?;

        info!("Survey server listening on {}", addr);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

/// Build the service routes.
///
/// `/v1/*` accepts cross-origin requests from anywhere; `/ping` does not.
pub fn router(log: Arc<RecordLog>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new()
        .route("/survey", post(submit_survey))
        .layer(cors);

    Router::new()
        .route("/ping", get(ping))
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { log })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down survey server");
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    utc_time: OffsetDateTime,
}

/// GET /ping - Liveness check
async fn ping() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "API is alive",
        utc_time: OffsetDateTime::now_utc(),
    })
}

/// POST /v1/survey - Validate, redact and store one submission
async fn submit_survey(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    let submission = SurveySubmission::from_json(&payload)?;

    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let context = request_context(&headers, peer);
    let record = redact(&submission, &context);

    state.log.append(&record).await?;

    info!(submission_id = %record.submission_id, "Stored survey submission");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "status": "ok" })),
    ))
}

fn request_context(headers: &HeaderMap, peer: Option<IpAddr>) -> RequestContext {
    let mut context = RequestContext::new(OffsetDateTime::now_utc());

    if let Some(user_agent) = header_str(headers, USER_AGENT) {
        context = context.with_user_agent(user_agent);
    }
    if let Some(forwarded) = header_str(headers, X_FORWARDED_FOR) {
        context = context.with_forwarded_for(forwarded);
    }
    if let Some(peer) = peer {
        context = context.with_peer_addr(peer);
    }

    context
}

fn header_str(headers: &HeaderMap, name: impl AsHeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
