use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::{DonationEngineError, Result};
use crate::receipt::ReceiptNumber;

// ===== DONATION KIND =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DonationKind {
    Monetary,
    InKind,
}

impl DonationKind {
    pub fn as_str(&self) -> &str {
        match self {
            DonationKind::Monetary => "monetary",
            DonationKind::InKind => "in-kind",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "in-kind" => DonationKind::InKind,
            _ => DonationKind::Monetary,
        }
    }
}

// ===== DONATION STATE =====

/// Explicit state per donation kind. Monetary donations are born verified
/// (the payment gateway confirmation stands in for NGO verification);
/// in-kind donations move Submitted -> Verified exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DonationState {
    Monetary {
        receipt_number: ReceiptNumber,
        payment_mode: String,
        payment_id: Option<String>,
    },
    InKindSubmitted,
    InKindVerified {
        receipt_number: ReceiptNumber,
        verified_at: DateTime<Utc>,
        receiver_name: String,
    },
}

// ===== DONATION =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationItem {
    pub name: String,
    pub quantity: u32,
    pub value: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub url: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub campaign_id: Uuid,
    pub ngo_id: Uuid,
    pub state: DonationState,
    pub items: Vec<DonationItem>,
    pub amount: Decimal,
    pub purpose: String,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub is_80g_eligible: bool,
    /// Opaque pass-through for the 80G receipt, never interpreted.
    pub pan_number: Option<String>,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: Option<String>,
    pub receipt: Option<ReceiptRecord>,
    pub created_at: DateTime<Utc>,
}

impl Donation {
    pub fn kind(&self) -> DonationKind {
        match self.state {
            DonationState::Monetary { .. } => DonationKind::Monetary,
            _ => DonationKind::InKind,
        }
    }

    pub fn is_verified(&self) -> bool {
        !matches!(self.state, DonationState::InKindSubmitted)
    }

    pub fn receipt_number(&self) -> Option<&ReceiptNumber> {
        match &self.state {
            DonationState::Monetary { receipt_number, .. } => Some(receipt_number),
            DonationState::InKindVerified { receipt_number, .. } => Some(receipt_number),
            DonationState::InKindSubmitted => None,
        }
    }

    /// Legacy payment-status view consumed by API clients.
    pub fn payment_status(&self) -> &'static str {
        match self.state {
            DonationState::Monetary { .. } => "success",
            DonationState::InKindSubmitted => "pending",
            DonationState::InKindVerified { .. } => "received",
        }
    }

    /// Precondition check for the Submitted -> Verified transition.
    /// Checked before any mutation so a rejected verify leaves the
    /// donation untouched.
    pub fn ensure_verifiable(&self) -> Result<()> {
        match &self.state {
            DonationState::Monetary { .. } => Err(DonationEngineError::InvalidType(
                "only in-kind donations need verification".to_string(),
            )),
            DonationState::InKindVerified { verified_at, .. } => {
                Err(DonationEngineError::InvalidState(format!(
                    "donation already verified at {}",
                    verified_at
                )))
            }
            DonationState::InKindSubmitted => Ok(()),
        }
    }

    /// Apply the verification transition. Caller must have passed
    /// `ensure_verifiable` and holds the single-writer lock on this
    /// donation. Item valuations are matched by name; unmatched items keep
    /// their prior value. Returns the amount to credit to the campaign.
    pub fn apply_verification(
        &mut self,
        receipt_number: ReceiptNumber,
        receiver_name: String,
        item_values: Option<&HashMap<String, Decimal>>,
        now: DateTime<Utc>,
    ) -> Decimal {
        let mut credited = Decimal::ZERO;

        if let Some(values) = item_values {
            for item in &mut self.items {
                if let Some(value) = values.get(&item.name) {
                    item.value = *value;
                }
            }
            let total: Decimal = self.items.iter().map(|i| i.value).sum();
            self.amount = total;
            credited = total;
        }

        self.state = DonationState::InKindVerified {
            receipt_number,
            verified_at: now,
            receiver_name,
        };

        credited
    }
}

// ===== CAMPAIGN =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub ngo_id: Uuid,
    pub title: String,
    pub category: String,
    pub ngo_name: String,
    pub ngo_registration_number: Option<String>,
    pub current_amount: Decimal,
    pub total_donors: u32,
    pub is_80g_eligible: bool,
    pub created_at: DateTime<Utc>,
}

// ===== REQUESTS / RESPONSES =====

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignRequest {
    pub ngo_id: Uuid,
    pub title: String,
    pub category: String,
    pub ngo_name: String,
    pub ngo_registration_number: Option<String>,
    #[serde(default)]
    pub is_80g_eligible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DonationItemRequest {
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub value: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDonationRequest {
    pub campaign_id: Uuid,
    pub donor_id: Uuid,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: Option<String>,
    pub donation_type: DonationKind,
    #[serde(default)]
    pub amount: Option<Decimal>,
    pub payment_mode: Option<String>,
    pub payment_id: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub pan_number: Option<String>,
    #[serde(default)]
    pub items: Vec<DonationItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyDonationRequest {
    pub receiver_name: Option<String>,
    /// Optional per-item valuations, keyed by item name.
    pub item_values: Option<HashMap<String, Decimal>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationResponse {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub donation_type: DonationKind,
    pub payment_status: String,
    pub is_verified: bool,
    pub amount: Decimal,
    pub receipt_number: Option<String>,
    pub receipt_url: Option<String>,
    pub items: Vec<DonationItem>,
    pub donor_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Donation> for DonationResponse {
    fn from(donation: &Donation) -> Self {
        DonationResponse {
            id: donation.id,
            campaign_id: donation.campaign_id,
            donation_type: donation.kind(),
            payment_status: donation.payment_status().to_string(),
            is_verified: donation.is_verified(),
            amount: donation.amount,
            receipt_number: donation.receipt_number().map(|n| n.to_string()),
            receipt_url: donation.receipt.as_ref().map(|r| r.url.clone()),
            items: donation.items.clone(),
            donor_name: donation.donor_name.clone(),
            created_at: donation.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptResponse {
    pub receipt_number: String,
    pub ngo_name: String,
    pub ngo_registration: Option<String>,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub campaign_name: String,
    pub is_80g_eligible: bool,
    pub donor_name: String,
    pub donor_email: String,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationStats {
    pub total_amount: Decimal,
    pub total_donations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn in_kind_donation() -> Donation {
        Donation {
            id: Uuid::new_v4(),
            donor_id: Uuid::new_v4(),
            campaign_id: Uuid::new_v4(),
            ngo_id: Uuid::new_v4(),
            state: DonationState::InKindSubmitted,
            items: vec![DonationItem {
                name: "Rice".to_string(),
                quantity: 10,
                value: Decimal::ZERO,
                description: None,
            }],
            amount: Decimal::ZERO,
            purpose: "Donation for Flood Relief".to_string(),
            message: None,
            is_anonymous: false,
            is_80g_eligible: false,
            pan_number: None,
            donor_name: "Asha".to_string(),
            donor_email: "asha@example.com".to_string(),
            donor_phone: None,
            receipt: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_submitted_donation_is_verifiable() {
        let donation = in_kind_donation();
        assert!(donation.ensure_verifiable().is_ok());
        assert_eq!(donation.payment_status(), "pending");
        assert!(!donation.is_verified());
    }

    #[test]
    fn test_verification_applies_item_values() {
        let mut donation = in_kind_donation();
        let number = ReceiptNumber::mint(DonationKind::InKind, Utc::now().date_naive(), 1);

        let mut values = HashMap::new();
        values.insert("Rice".to_string(), dec!(500));

        let credited = donation.apply_verification(
            number,
            "Ravi".to_string(),
            Some(&values),
            Utc::now(),
        );

        assert_eq!(credited, dec!(500));
        assert_eq!(donation.amount, dec!(500));
        assert_eq!(donation.items[0].value, dec!(500));
        assert_eq!(donation.payment_status(), "received");
        assert!(donation.ensure_verifiable().is_err());
    }

    #[test]
    fn test_unmatched_items_keep_prior_value() {
        let mut donation = in_kind_donation();
        donation.items.push(DonationItem {
            name: "Blankets".to_string(),
            quantity: 5,
            value: dec!(200),
            description: None,
        });
        let number = ReceiptNumber::mint(DonationKind::InKind, Utc::now().date_naive(), 1);

        let mut values = HashMap::new();
        values.insert("Rice".to_string(), dec!(500));

        let credited = donation.apply_verification(
            number,
            "Ravi".to_string(),
            Some(&values),
            Utc::now(),
        );

        // Blankets were never revalued, but their prior value still counts.
        assert_eq!(credited, dec!(700));
        assert_eq!(donation.items[1].value, dec!(200));
    }

    #[test]
    fn test_verification_without_values_credits_nothing() {
        let mut donation = in_kind_donation();
        let number = ReceiptNumber::mint(DonationKind::InKind, Utc::now().date_naive(), 1);

        let credited =
            donation.apply_verification(number, "Ravi".to_string(), None, Utc::now());

        assert_eq!(credited, Decimal::ZERO);
        assert_eq!(donation.amount, Decimal::ZERO);
        assert!(donation.is_verified());
    }
}
