use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::errors::{DonationEngineError, Result};
use crate::models::{Campaign, Donation, DonationStats, ReceiptRecord};

/// In-memory document store for donations and campaigns.
///
/// Stands in for the platform's document database at the service seam.
/// Each entry mutation runs under the map's per-entry lock, which gives
/// the single-writer guarantee the verification transition relies on.
pub struct DonationStore {
    donations: DashMap<Uuid, Donation>,
    campaigns: DashMap<Uuid, Campaign>,
}

impl DonationStore {
    pub fn new() -> Self {
        DonationStore {
            donations: DashMap::new(),
            campaigns: DashMap::new(),
        }
    }

    // ===== CAMPAIGNS =====

    pub fn insert_campaign(&self, campaign: Campaign) {
        self.campaigns.insert(campaign.id, campaign);
    }

    pub fn get_campaign(&self, id: Uuid) -> Result<Campaign> {
        self.campaigns
            .get(&id)
            .map(|c| c.clone())
            .ok_or(DonationEngineError::CampaignNotFound(id))
    }

    /// Atomically add `amount` to the campaign's running total. Additive
    /// only; totals are never recomputed from scratch.
    pub fn credit_campaign(
        &self,
        id: Uuid,
        amount: Decimal,
        new_donor: bool,
    ) -> Result<Campaign> {
        let mut campaign = self
            .campaigns
            .get_mut(&id)
            .ok_or(DonationEngineError::CampaignNotFound(id))?;
        campaign.current_amount += amount;
        if new_donor {
            campaign.total_donors += 1;
        }
        Ok(campaign.clone())
    }

    // ===== DONATIONS =====

    pub fn insert_donation(&self, donation: Donation) {
        self.donations.insert(donation.id, donation);
    }

    pub fn get_donation(&self, id: Uuid) -> Result<Donation> {
        self.donations
            .get(&id)
            .map(|d| d.clone())
            .ok_or(DonationEngineError::DonationNotFound(id))
    }

    /// Run `f` against the donation under its entry lock. Two concurrent
    /// verifications of the same donation serialize here, so only the
    /// first can see the Submitted state.
    pub fn with_donation_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Donation) -> Result<T>,
    ) -> Result<T> {
        let mut donation = self
            .donations
            .get_mut(&id)
            .ok_or(DonationEngineError::DonationNotFound(id))?;
        f(&mut donation)
    }

    /// Record the rendered receipt. Set exactly once; repeated pipeline
    /// runs for the same donation are ignored.
    pub fn set_receipt_record(&self, id: Uuid, url: String, generated_at: DateTime<Utc>) {
        match self.donations.get_mut(&id) {
            Some(mut donation) => {
                if donation.receipt.is_none() {
                    donation.receipt = Some(ReceiptRecord { url, generated_at });
                }
            }
            None => warn!("receipt rendered for unknown donation {}", id),
        }
    }

    pub fn donations_by_donor(&self, donor_id: Uuid) -> Vec<Donation> {
        let mut donations: Vec<Donation> = self
            .donations
            .iter()
            .filter(|d| d.donor_id == donor_id)
            .map(|d| d.clone())
            .collect();
        donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        donations
    }

    pub fn stats(&self) -> DonationStats {
        let mut total_amount = Decimal::ZERO;
        let mut total_donations = 0u64;
        for donation in self.donations.iter() {
            total_amount += donation.amount;
            total_donations += 1;
        }
        DonationStats {
            total_amount,
            total_donations,
        }
    }
}

impl Default for DonationStore {
    fn default() -> Self {
        Self::new()
    }
}
