use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::DonationEngineError;
use crate::metrics;
use crate::models::{CreateCampaignRequest, CreateDonationRequest, VerifyDonationRequest};
use crate::services::DonationService;

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": crate::SERVICE_NAME,
        "version": crate::VERSION
    }))
}

/// Prometheus metrics endpoint
pub async fn prometheus_metrics() -> Result<HttpResponse, DonationEngineError> {
    let body = metrics::metrics_handler()
        .map_err(|e| DonationEngineError::Internal(format!("Failed to gather metrics: {}", e)))?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

/// Register a campaign
pub async fn create_campaign(
    service: web::Data<Arc<DonationService>>,
    request: web::Json<CreateCampaignRequest>,
) -> Result<HttpResponse, DonationEngineError> {
    let campaign = service.create_campaign(request.into_inner());
    Ok(HttpResponse::Created().json(campaign))
}

/// Get a campaign
pub async fn get_campaign(
    service: web::Data<Arc<DonationService>>,
    campaign_id: web::Path<Uuid>,
) -> Result<HttpResponse, DonationEngineError> {
    let campaign = service.get_campaign(*campaign_id)?;
    Ok(HttpResponse::Ok().json(campaign))
}

/// Record a donation (monetary or in-kind)
pub async fn create_donation(
    service: web::Data<Arc<DonationService>>,
    request: web::Json<CreateDonationRequest>,
) -> Result<HttpResponse, DonationEngineError> {
    let donation = service.create_donation(request.into_inner()).await?;
    let message = if donation.is_verified {
        "Donation successful!"
    } else {
        "Donation pending verification."
    };
    Ok(HttpResponse::Created().json(json!({
        "message": message,
        "donation": donation
    })))
}

/// NGO verification of an in-kind donation
pub async fn verify_donation(
    service: web::Data<Arc<DonationService>>,
    donation_id: web::Path<Uuid>,
    request: web::Json<VerifyDonationRequest>,
) -> Result<HttpResponse, DonationEngineError> {
    let donation = service
        .verify_in_kind(*donation_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Donation verified, receipt generated and emailed!",
        "donation": donation
    })))
}

/// Get a donation by ID
pub async fn get_donation(
    service: web::Data<Arc<DonationService>>,
    donation_id: web::Path<Uuid>,
) -> Result<HttpResponse, DonationEngineError> {
    let donation = service.get_donation(*donation_id)?;
    Ok(HttpResponse::Ok().json(donation))
}

/// Get receipt metadata for a donation
pub async fn get_receipt(
    service: web::Data<Arc<DonationService>>,
    donation_id: web::Path<Uuid>,
) -> Result<HttpResponse, DonationEngineError> {
    let receipt = service.get_receipt(*donation_id)?;
    Ok(HttpResponse::Ok().json(json!({ "receipt": receipt })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

/// Donor donation history, newest first
pub async fn donation_history(
    service: web::Data<Arc<DonationService>>,
    donor_id: web::Path<Uuid>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, DonationEngineError> {
    let limit = query.limit.clamp(1, 100);
    let (donations, total, total_donated) =
        service.donation_history(*donor_id, query.page, limit);

    Ok(HttpResponse::Ok().json(json!({
        "donations": donations,
        "pagination": {
            "page": query.page.max(1),
            "limit": limit,
            "total": total,
            "pages": (total + limit - 1) / limit
        },
        "statistics": {
            "total_donated": total_donated,
            "total_donations": total
        }
    })))
}

/// Aggregate donation statistics
pub async fn donation_stats(
    service: web::Data<Arc<DonationService>>,
) -> Result<HttpResponse, DonationEngineError> {
    Ok(HttpResponse::Ok().json(json!({ "stats": service.stats() })))
}

/// Configure routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(prometheus_metrics))
        .service(
            web::scope("/api/v1")
                .route("/campaigns", web::post().to(create_campaign))
                .route("/campaigns/{id}", web::get().to(get_campaign))
                .route("/donations", web::post().to(create_donation))
                .route("/donations/stats", web::get().to(donation_stats))
                .route("/donations/{id}", web::get().to(get_donation))
                .route("/donations/{id}/verify", web::post().to(verify_donation))
                .route("/donations/{id}/receipt", web::get().to(get_receipt))
                .route(
                    "/donations/history/{donor_id}",
                    web::get().to(donation_history),
                ),
        );
}
