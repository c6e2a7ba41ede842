//! Messages carried by the click pipeline.

use std::time::Instant;
use tokio::sync::oneshot;

/// One redirect of a short link, queued for counting.
///
/// Created in the redirect handler and consumed by
/// [`crate::domain::click_worker::run_click_worker`]. The handler never waits
/// for it to be applied.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub id: String,
    pub queued_at: Instant,
}

impl ClickEvent {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            queued_at: Instant::now(),
        }
    }
}

/// Everything that travels through the click conduit.
#[derive(Debug)]
pub enum ClickMessage {
    Click(ClickEvent),
    /// Barrier: acknowledged once every message queued before it is applied.
    Flush(oneshot::Sender<()>),
}
