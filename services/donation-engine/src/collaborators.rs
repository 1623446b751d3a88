use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::{Campaign, Donation, DonationItem};
use crate::receipt::ReceiptNumber;

/// Everything the receipt renderer needs, snapshotted at dispatch time so
/// the pipeline never reads shared state.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptData {
    pub receipt_number: ReceiptNumber,
    pub ngo_name: String,
    pub ngo_registration: Option<String>,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub campaign_name: String,
    pub campaign_category: String,
    pub is_80g_eligible: bool,
    pub pan_number: Option<String>,
    pub donor_name: String,
    pub donor_email: String,
    pub is_anonymous: bool,
    pub items: Vec<DonationItem>,
}

impl ReceiptData {
    pub fn build(donation: &Donation, campaign: &Campaign, number: &ReceiptNumber) -> Self {
        ReceiptData {
            receipt_number: number.clone(),
            ngo_name: campaign.ngo_name.clone(),
            ngo_registration: campaign.ngo_registration_number.clone(),
            date: donation.created_at,
            amount: donation.amount,
            campaign_name: campaign.title.clone(),
            campaign_category: campaign.category.clone(),
            is_80g_eligible: donation.is_80g_eligible,
            pan_number: donation.pan_number.clone(),
            donor_name: donation.donor_name.clone(),
            donor_email: donation.donor_email.clone(),
            is_anonymous: donation.is_anonymous,
            items: donation.items.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DonorNotice {
    pub kind: String,
    pub title: String,
    pub body: String,
    pub campaign_id: Uuid,
}

/// PDF rendering collaborator. Returns the URL the rendered receipt is
/// served from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptRenderer: Send + Sync {
    async fn render(&self, receipt: &ReceiptData) -> anyhow::Result<String>;
}

/// Email delivery collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptMailer: Send + Sync {
    async fn send_receipt(&self, email: &str, receipt_url: &str) -> anyhow::Result<()>;
    async fn send_submission_notice(&self, email: &str, campaign_title: &str)
        -> anyhow::Result<()>;
}

/// In-app notification collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorNotifier: Send + Sync {
    async fn notify(&self, donor_id: Uuid, notice: DonorNotice) -> anyhow::Result<()>;
}

/// Default renderer: hands the receipt off to the receipts volume and
/// returns the stable `receipt_<number>.pdf` URL.
pub struct LocalReceiptRenderer {
    base_url: String,
}

impl LocalReceiptRenderer {
    pub fn new(base_url: String) -> Self {
        LocalReceiptRenderer { base_url }
    }
}

#[async_trait]
impl ReceiptRenderer for LocalReceiptRenderer {
    async fn render(&self, receipt: &ReceiptData) -> anyhow::Result<String> {
        let filename = receipt.receipt_number.pdf_filename();
        info!(
            receipt_number = %receipt.receipt_number,
            donor = %receipt.donor_name,
            "rendering receipt {}",
            filename
        );
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), filename))
    }
}

/// Log-only mailer used until SMTP credentials are wired in.
pub struct LoggingMailer;

#[async_trait]
impl ReceiptMailer for LoggingMailer {
    async fn send_receipt(&self, email: &str, receipt_url: &str) -> anyhow::Result<()> {
        info!("sending receipt {} to {}", receipt_url, email);
        Ok(())
    }

    async fn send_submission_notice(
        &self,
        email: &str,
        campaign_title: &str,
    ) -> anyhow::Result<()> {
        info!(
            "notifying {} that their donation to \"{}\" awaits verification",
            email, campaign_title
        );
        Ok(())
    }
}

/// Log-only in-app notifier.
pub struct LoggingNotifier;

#[async_trait]
impl DonorNotifier for LoggingNotifier {
    async fn notify(&self, donor_id: Uuid, notice: DonorNotice) -> anyhow::Result<()> {
        info!(donor = %donor_id, kind = %notice.kind, "notification: {}", notice.title);
        Ok(())
    }
}
