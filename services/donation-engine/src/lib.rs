// Donation Engine Library
// Donation recording, NGO verification and receipt numbering

pub mod collaborators;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod receipt;
pub mod services;
pub mod store;

// Re-exports
pub use errors::{DonationEngineError, Result};
pub use models::*;
pub use receipt::{ReceiptNumber, ReceiptSequencer};
pub use services::DonationService;
pub use store::DonationStore;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "donation-engine";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_service_name() {
        assert_eq!(SERVICE_NAME, "donation-engine");
    }
}
