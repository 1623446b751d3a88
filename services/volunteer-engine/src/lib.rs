// Volunteer Engine Library
// Participation ledger with badge and streak gamification

pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod progress;
pub mod services;
pub mod store;

// Re-exports
pub use errors::{Result, VolunteerEngineError};
pub use models::*;
pub use progress::VolunteerProgress;
pub use services::VolunteerService;
pub use store::VolunteerStore;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "volunteer-engine";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_service_name() {
        assert_eq!(SERVICE_NAME, "volunteer-engine");
    }
}
