use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::collaborators::{
    DonorNotice, DonorNotifier, ReceiptData, ReceiptMailer, ReceiptRenderer,
};
use crate::errors::{DonationEngineError, Result};
use crate::metrics;
use crate::models::{
    Campaign, CreateCampaignRequest, CreateDonationRequest, Donation, DonationItem,
    DonationKind, DonationResponse, DonationState, DonationStats, ReceiptResponse,
    VerifyDonationRequest,
};
use crate::receipt::ReceiptSequencer;
use crate::store::DonationStore;

/// Campaign category whose in-kind donations are verified on arrival.
/// Perishables cannot wait for a coordinator to sign off.
const AUTO_VERIFY_CATEGORY: &str = "Food";
const AUTO_VERIFY_RECEIVER: &str = "System (Auto-Food)";

pub struct DonationService {
    pub store: Arc<DonationStore>,
    sequencer: Arc<ReceiptSequencer>,
    renderer: Arc<dyn ReceiptRenderer>,
    mailer: Arc<dyn ReceiptMailer>,
    notifier: Arc<dyn DonorNotifier>,
    side_effect_timeout: Duration,
}

impl DonationService {
    pub fn new(
        store: Arc<DonationStore>,
        sequencer: Arc<ReceiptSequencer>,
        renderer: Arc<dyn ReceiptRenderer>,
        mailer: Arc<dyn ReceiptMailer>,
        notifier: Arc<dyn DonorNotifier>,
        side_effect_timeout: Duration,
    ) -> Self {
        DonationService {
            store,
            sequencer,
            renderer,
            mailer,
            notifier,
            side_effect_timeout,
        }
    }

    // ===== CAMPAIGNS =====

    pub fn create_campaign(&self, request: CreateCampaignRequest) -> Campaign {
        let campaign = Campaign {
            id: Uuid::new_v4(),
            ngo_id: request.ngo_id,
            title: request.title,
            category: request.category,
            ngo_name: request.ngo_name,
            ngo_registration_number: request.ngo_registration_number,
            current_amount: Decimal::ZERO,
            total_donors: 0,
            is_80g_eligible: request.is_80g_eligible,
            created_at: Utc::now(),
        };
        self.store.insert_campaign(campaign.clone());
        campaign
    }

    pub fn get_campaign(&self, id: Uuid) -> Result<Campaign> {
        self.store.get_campaign(id)
    }

    // ===== DONATION CREATION =====

    pub async fn create_donation(
        &self,
        request: CreateDonationRequest,
    ) -> Result<DonationResponse> {
        let campaign = self.store.get_campaign(request.campaign_id)?;
        let now = Utc::now();

        let donation = match request.donation_type {
            DonationKind::Monetary => self.build_monetary(&request, &campaign)?,
            DonationKind::InKind => self.build_in_kind(&request, &campaign)?,
        };

        metrics::DONATIONS_CREATED
            .with_label_values(&[donation.kind().as_str()])
            .inc();
        if let Some(value) = donation.amount.to_f64() {
            if value > 0.0 {
                metrics::DONATION_VALUE.observe(value);
            }
        }

        // Campaign totals become final at creation for monetary donations
        // and for auto-verified in-kind ones.
        match &donation.state {
            DonationState::Monetary { .. } => {
                self.store
                    .credit_campaign(campaign.id, donation.amount, true)?;
            }
            DonationState::InKindVerified { .. } => {
                self.store
                    .credit_campaign(campaign.id, Decimal::ZERO, true)?;
            }
            DonationState::InKindSubmitted => {}
        }

        self.store.insert_donation(donation.clone());
        info!(
            donation = %donation.id,
            campaign = %campaign.id,
            kind = donation.kind().as_str(),
            status = donation.payment_status(),
            "donation recorded at {}",
            now
        );

        if donation.is_verified() {
            self.dispatch_receipt_pipeline(donation.clone(), campaign, verified_notice(&donation));
        } else {
            self.dispatch_submission_notices(donation.clone(), campaign);
        }

        Ok(DonationResponse::from(&donation))
    }

    fn build_monetary(
        &self,
        request: &CreateDonationRequest,
        campaign: &Campaign,
    ) -> Result<Donation> {
        let amount = request.amount.unwrap_or(Decimal::ZERO);
        if amount <= Decimal::ZERO {
            return Err(DonationEngineError::Validation(
                "monetary donation requires a positive amount".to_string(),
            ));
        }

        let receipt_number = self.sequencer.next(DonationKind::Monetary);
        let is_80g = campaign.is_80g_eligible;

        Ok(Donation {
            id: Uuid::new_v4(),
            donor_id: request.donor_id,
            campaign_id: campaign.id,
            ngo_id: campaign.ngo_id,
            state: DonationState::Monetary {
                receipt_number,
                payment_mode: request
                    .payment_mode
                    .clone()
                    .unwrap_or_else(|| "manual".to_string()),
                payment_id: request.payment_id.clone(),
            },
            items: Vec::new(),
            amount,
            purpose: format!("Donation for {}", campaign.title),
            message: request.message.clone(),
            is_anonymous: request.is_anonymous,
            is_80g_eligible: is_80g,
            pan_number: if is_80g { request.pan_number.clone() } else { None },
            donor_name: donor_display_name(request),
            donor_email: request.donor_email.clone(),
            donor_phone: request.donor_phone.clone(),
            receipt: None,
            created_at: Utc::now(),
        })
    }

    fn build_in_kind(
        &self,
        request: &CreateDonationRequest,
        campaign: &Campaign,
    ) -> Result<Donation> {
        if request.items.is_empty() {
            return Err(DonationEngineError::Validation(
                "in-kind donation requires at least one item".to_string(),
            ));
        }
        let items: Vec<DonationItem> = request
            .items
            .iter()
            .map(|item| {
                if item.quantity == 0 {
                    return Err(DonationEngineError::Validation(format!(
                        "item \"{}\" has zero quantity",
                        item.name
                    )));
                }
                Ok(DonationItem {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    value: item.value.unwrap_or(Decimal::ZERO),
                    description: item.description.clone(),
                })
            })
            .collect::<Result<_>>()?;

        let state = if campaign.category == AUTO_VERIFY_CATEGORY {
            DonationState::InKindVerified {
                receipt_number: self.sequencer.next(DonationKind::InKind),
                verified_at: Utc::now(),
                receiver_name: AUTO_VERIFY_RECEIVER.to_string(),
            }
        } else {
            DonationState::InKindSubmitted
        };

        Ok(Donation {
            id: Uuid::new_v4(),
            donor_id: request.donor_id,
            campaign_id: campaign.id,
            ngo_id: campaign.ngo_id,
            state,
            items,
            amount: Decimal::ZERO,
            purpose: format!("Donation for {}", campaign.title),
            message: request.message.clone(),
            is_anonymous: request.is_anonymous,
            is_80g_eligible: false,
            pan_number: None,
            donor_name: donor_display_name(request),
            donor_email: request.donor_email.clone(),
            donor_phone: request.donor_phone.clone(),
            receipt: None,
            created_at: Utc::now(),
        })
    }

    // ===== VERIFICATION =====

    /// Submitted -> Verified transition for an in-kind donation.
    ///
    /// Preconditions are checked before any mutation, under the donation's
    /// entry lock, so a rejected call leaves no trace and two concurrent
    /// calls cannot both succeed. The receipt number is minted inside the
    /// critical section; the pipeline side effects run after commit and
    /// never roll it back.
    pub async fn verify_in_kind(
        &self,
        donation_id: Uuid,
        request: VerifyDonationRequest,
    ) -> Result<DonationResponse> {
        let result = self.store.with_donation_mut(donation_id, |donation| {
            donation.ensure_verifiable()?;

            let receipt_number = self.sequencer.next(DonationKind::InKind);
            let receiver = request.receiver_name.clone().unwrap_or_else(|| {
                self.store
                    .get_campaign(donation.campaign_id)
                    .map(|c| c.ngo_name)
                    .unwrap_or_else(|_| "NGO Coordinator".to_string())
            });
            let credited = donation.apply_verification(
                receipt_number,
                receiver,
                request.item_values.as_ref(),
                Utc::now(),
            );
            Ok((donation.clone(), credited))
        });

        let (donation, credited) = match result {
            Ok(ok) => ok,
            Err(err) => {
                metrics::VERIFICATION_REJECTED
                    .with_label_values(&[rejection_label(&err)])
                    .inc();
                return Err(err);
            }
        };

        if credited > Decimal::ZERO {
            self.store
                .credit_campaign(donation.campaign_id, credited, false)?;
        }

        metrics::DONATIONS_VERIFIED.inc();
        info!(
            donation = %donation.id,
            receipt = ?donation.receipt_number(),
            credited = %credited,
            "in-kind donation verified"
        );

        let campaign = self.store.get_campaign(donation.campaign_id)?;
        self.dispatch_receipt_pipeline(donation.clone(), campaign, verified_notice(&donation));

        Ok(DonationResponse::from(&donation))
    }

    // ===== READS =====

    pub fn get_donation(&self, id: Uuid) -> Result<DonationResponse> {
        Ok(DonationResponse::from(&self.store.get_donation(id)?))
    }

    pub fn get_receipt(&self, id: Uuid) -> Result<ReceiptResponse> {
        let donation = self.store.get_donation(id)?;
        let number = donation.receipt_number().ok_or_else(|| {
            DonationEngineError::InvalidState(
                "receipt is issued at verification; donation is still pending".to_string(),
            )
        })?;
        let campaign = self.store.get_campaign(donation.campaign_id)?;

        Ok(ReceiptResponse {
            receipt_number: number.to_string(),
            ngo_name: campaign.ngo_name,
            ngo_registration: campaign.ngo_registration_number,
            date: donation.created_at,
            amount: donation.amount,
            campaign_name: campaign.title,
            is_80g_eligible: donation.is_80g_eligible,
            donor_name: donation.donor_name.clone(),
            donor_email: donation.donor_email.clone(),
            receipt_url: donation.receipt.as_ref().map(|r| r.url.clone()),
        })
    }

    pub fn donation_history(
        &self,
        donor_id: Uuid,
        page: usize,
        limit: usize,
    ) -> (Vec<DonationResponse>, usize, Decimal) {
        let all = self.store.donations_by_donor(donor_id);
        let total = all.len();
        let total_donated: Decimal = all.iter().map(|d| d.amount).sum();
        // Caller-supplied page numbers can be anything up to usize::MAX;
        // saturate instead of overflowing, an out-of-range page is empty.
        let skip = page.saturating_sub(1).saturating_mul(limit);
        let donations = all
            .iter()
            .skip(skip)
            .take(limit)
            .map(DonationResponse::from)
            .collect();
        (donations, total, total_donated)
    }

    pub fn stats(&self) -> DonationStats {
        self.store.stats()
    }

    // ===== RECEIPT PIPELINE =====

    fn dispatch_receipt_pipeline(
        &self,
        donation: Donation,
        campaign: Campaign,
        notice: DonorNotice,
    ) {
        let pipeline = ReceiptPipeline {
            store: Arc::clone(&self.store),
            renderer: Arc::clone(&self.renderer),
            mailer: Arc::clone(&self.mailer),
            notifier: Arc::clone(&self.notifier),
            timeout: self.side_effect_timeout,
        };
        tokio::spawn(async move {
            pipeline.run(donation, campaign, notice).await;
        });
    }

    fn dispatch_submission_notices(&self, donation: Donation, campaign: Campaign) {
        let mailer = Arc::clone(&self.mailer);
        let notifier = Arc::clone(&self.notifier);
        let bound = self.side_effect_timeout;
        tokio::spawn(async move {
            best_effort(bound, "mail", async {
                mailer
                    .send_submission_notice(&donation.donor_email, &campaign.title)
                    .await
            })
            .await;
            best_effort(bound, "notify", async {
                notifier
                    .notify(donation.donor_id, submission_notice(&donation, &campaign))
                    .await
            })
            .await;
        });
    }
}

/// Post-commit receipt side effects: render, persist the receipt record,
/// email, notify. Failures are logged and counted, never propagated, and
/// the committed verification is never reverted.
pub(crate) struct ReceiptPipeline {
    pub store: Arc<DonationStore>,
    pub renderer: Arc<dyn ReceiptRenderer>,
    pub mailer: Arc<dyn ReceiptMailer>,
    pub notifier: Arc<dyn DonorNotifier>,
    pub timeout: Duration,
}

impl ReceiptPipeline {
    pub(crate) async fn run(&self, donation: Donation, campaign: Campaign, notice: DonorNotice) {
        let Some(number) = donation.receipt_number().cloned() else {
            warn!(donation = %donation.id, "receipt pipeline invoked for unverified donation");
            return;
        };

        let data = ReceiptData::build(&donation, &campaign, &number);
        let url = best_effort(self.timeout, "render", self.renderer.render(&data)).await;

        if let Some(url) = &url {
            self.store
                .set_receipt_record(donation.id, url.clone(), Utc::now());
            metrics::RECEIPTS_GENERATED.inc();

            best_effort(self.timeout, "mail", async {
                self.mailer.send_receipt(&donation.donor_email, url).await
            })
            .await;
        }

        best_effort(self.timeout, "notify", async {
            self.notifier.notify(donation.donor_id, notice).await
        })
        .await;
    }
}

/// Run a collaborator call with a bounded timeout, logging and counting
/// failures instead of surfacing them.
async fn best_effort<T>(
    bound: Duration,
    collaborator: &str,
    fut: impl Future<Output = anyhow::Result<T>>,
) -> Option<T> {
    match timeout(bound, fut).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            error!("{} collaborator failed: {:#}", collaborator, err);
            metrics::SIDE_EFFECT_FAILURES
                .with_label_values(&[collaborator])
                .inc();
            None
        }
        Err(_) => {
            error!("{} collaborator timed out after {:?}", collaborator, bound);
            metrics::SIDE_EFFECT_FAILURES
                .with_label_values(&[collaborator])
                .inc();
            None
        }
    }
}

fn donor_display_name(request: &CreateDonationRequest) -> String {
    if request.is_anonymous {
        "Anonymous".to_string()
    } else {
        request.donor_name.clone()
    }
}

fn verified_notice(donation: &Donation) -> DonorNotice {
    DonorNotice {
        kind: "success".to_string(),
        title: "Donation Verified!".to_string(),
        body: "The NGO has verified and received your donation. Thank you!".to_string(),
        campaign_id: donation.campaign_id,
    }
}

fn submission_notice(donation: &Donation, campaign: &Campaign) -> DonorNotice {
    DonorNotice {
        kind: "donation".to_string(),
        title: "Donation Received!".to_string(),
        body: format!(
            "Your request to donate items to \"{}\" has been received and is pending NGO verification.",
            campaign.title
        ),
        campaign_id: donation.campaign_id,
    }
}

fn rejection_label(err: &DonationEngineError) -> &'static str {
    match err {
        DonationEngineError::DonationNotFound(_) => "not_found",
        DonationEngineError::InvalidState(_) => "already_verified",
        DonationEngineError::InvalidType(_) => "wrong_type",
        _ => "other",
    }
}
