use std::time::Duration;

use async_trait::async_trait;

pub const STAGE_FETCHING: &str = "Fetching source playlist...";
pub const STAGE_MATCHING: &str = "Matching tracks...";
pub const STAGE_CREATING: &str = "Creating destination playlist...";
pub const STAGE_COMPLETED: &str = "Conversion completed successfully!";

pub fn stage_total_found(total: u32) -> String {
    format!("Total tracks found: {}", total)
}

pub fn stage_matched(matched: u32) -> String {
    format!("Successfully matched: {} tracks", matched)
}

/// Paces the gap between staged progress messages.
///
/// The backend reports the whole conversion in one response, so the client
/// spreads the stage messages out itself. Swapping the pacer swaps that
/// policy (e.g. for real server-pushed progress) without touching the state
/// machine.
#[async_trait]
pub trait StagePacer: Send + Sync {
    async fn pace(&self);
}

/// Default policy: a fixed pause between stages.
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl StagePacer for FixedDelayPacer {
    async fn pace(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No pacing at all; stages land back to back.
pub struct ImmediatePacer;

#[async_trait]
impl StagePacer for ImmediatePacer {
    async fn pace(&self) {}
}
