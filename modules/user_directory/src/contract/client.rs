use async_trait::async_trait;

use crate::contract::{error::DashboardError, model::UserRecord};

/// Port for wherever the initial record set comes from.
///
/// A fetch resolves exactly once; the engine never retries a failed one.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetch the full, ordered record sequence.
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, DashboardError>;
}
