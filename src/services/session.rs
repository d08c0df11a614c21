use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use super::ranking::{NextComparison, RankingService, RankingSnapshot};
use crate::config::settings::SessionSettings;
use crate::domain::models::StoreInfo;
use crate::errors::RankingResult;
use crate::rating::{ComparisonOutcome, StoreId, UserId};

/// Source of human judgments for a comparison session.
pub trait Judge {
    /// Returns the preferred store id, or `None` to leave the session.
    fn choose(&mut self, first: &StoreInfo, second: &StoreInfo) -> Result<Option<StoreId>>;

    /// Called after each recorded comparison.
    fn recorded(&mut self, _outcome: &ComparisonOutcome) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    /// Every candidate store is ranked
    Complete,
    /// Fewer than two stores to compare
    InsufficientStores,
    /// The judge walked away
    Abandoned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub end: SessionEnd,
    pub comparisons: usize,
    pub snapshot: RankingSnapshot,
}

/// Drives select → judge → record until every store is ranked.
///
/// Holds no state between iterations: each step re-reads the catalog and the
/// persisted ratings, so a session can be dropped and restarted at any point.
pub struct ComparisonSession<'a> {
    service: &'a RankingService,
    settings: SessionSettings,
    user_id: UserId,
}

impl<'a> ComparisonSession<'a> {
    pub fn new(service: &'a RankingService, settings: SessionSettings, user_id: UserId) -> Self {
        Self {
            service,
            settings,
            user_id,
        }
    }

    pub fn run<J: Judge + ?Sized>(&self, judge: &mut J) -> Result<SessionReport> {
        let mut comparisons = 0;

        let end = loop {
            let (first, second) = match self.service.next_comparison(self.user_id)? {
                NextComparison::Pair(first, second) => (first, second),
                NextComparison::Complete => break SessionEnd::Complete,
                NextComparison::InsufficientStores => break SessionEnd::InsufficientStores,
            };

            let Some(winner) = judge.choose(&first, &second)? else {
                break SessionEnd::Abandoned;
            };
            let loser = if winner == first.id { second.id } else { first.id };

            let outcome = self.record_with_retry(winner, loser)?;
            judge.recorded(&outcome);
            comparisons += 1;
        };

        info!(
            "Session for user {} finished ({:?}) after {} comparisons",
            self.user_id, end, comparisons
        );

        Ok(SessionReport {
            end,
            comparisons,
            snapshot: self.service.rankings(self.user_id)?,
        })
    }

    /// Storage failures happen before anything is written, so the same
    /// judgment can be resubmitted as is.
    fn record_with_retry(&self, winner: StoreId, loser: StoreId) -> RankingResult<ComparisonOutcome> {
        let mut attempt = 1;
        loop {
            match self.service.compare(self.user_id, winner, loser) {
                Err(err) if err.is_retryable() && attempt < self.settings.max_attempts => {
                    warn!("Attempt {} to record comparison failed: {}", attempt, err);
                    thread::sleep(Duration::from_millis(self.settings.retry_delay_ms * attempt as u64));
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
