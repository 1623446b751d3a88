use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::LeaderboardConfig;
use crate::errors::VolunteerEngineError;
use crate::metrics;
use crate::models::{CreateVolunteerCampaignRequest, LeaderboardKind, RecordEventRequest};
use crate::services::VolunteerService;

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": crate::SERVICE_NAME,
        "version": crate::VERSION
    }))
}

/// Prometheus metrics endpoint
pub async fn prometheus_metrics() -> Result<HttpResponse, VolunteerEngineError> {
    let body = metrics::metrics_handler()
        .map_err(|e| VolunteerEngineError::Internal(format!("Failed to gather metrics: {}", e)))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

/// Register a campaign needing volunteers
pub async fn create_campaign(
    service: web::Data<Arc<VolunteerService>>,
    request: web::Json<CreateVolunteerCampaignRequest>,
) -> Result<HttpResponse, VolunteerEngineError> {
    let campaign = service.create_campaign(request.into_inner());
    Ok(HttpResponse::Created().json(campaign))
}

/// Record a completed volunteer event
pub async fn record_event(
    service: web::Data<Arc<VolunteerService>>,
    request: web::Json<RecordEventRequest>,
) -> Result<HttpResponse, VolunteerEngineError> {
    let progress = service.record_event(request.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "progress": progress })))
}

/// Join a campaign as a volunteer
pub async fn join_campaign(
    service: web::Data<Arc<VolunteerService>>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, VolunteerEngineError> {
    let (volunteer_id, campaign_id) = path.into_inner();
    let response = service.join_campaign(volunteer_id, campaign_id)?;
    Ok(HttpResponse::Ok().json(response))
}

/// Volunteer progress dashboard
pub async fn get_progress(
    service: web::Data<Arc<VolunteerService>>,
    volunteer_id: web::Path<Uuid>,
) -> Result<HttpResponse, VolunteerEngineError> {
    let progress = service.get_progress(*volunteer_id);
    Ok(HttpResponse::Ok().json(json!({ "progress": progress })))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: LeaderboardKind,
    pub limit: Option<usize>,
}

fn default_kind() -> LeaderboardKind {
    LeaderboardKind::Overall
}

/// Volunteer leaderboard
pub async fn leaderboard(
    service: web::Data<Arc<VolunteerService>>,
    config: web::Data<LeaderboardConfig>,
    query: web::Query<LeaderboardQuery>,
) -> Result<HttpResponse, VolunteerEngineError> {
    let limit = query
        .limit
        .unwrap_or(config.default_limit)
        .clamp(1, config.max_limit);
    let board = service.leaderboard(query.kind, limit);
    Ok(HttpResponse::Ok().json(json!({ "leaderboard": board })))
}

/// Configure routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(prometheus_metrics))
        .service(
            web::scope("/api/v1/volunteers")
                .route("/campaigns", web::post().to(create_campaign))
                .route("/events", web::post().to(record_event))
                .route("/leaderboard", web::get().to(leaderboard))
                .route(
                    "/{volunteer_id}/join/{campaign_id}",
                    web::post().to(join_campaign),
                )
                .route("/{volunteer_id}/progress", web::get().to(get_progress)),
        );
}
