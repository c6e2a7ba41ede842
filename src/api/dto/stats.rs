//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::LinkStats;

/// A link with its current click count.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub id: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub clicks: u64,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            id: stats.link.id,
            target: stats.link.target,
            created_at: stats.link.created_at,
            clicks: stats.clicks,
        }
    }
}
