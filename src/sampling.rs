//! Best-effort collection of detailed match records.
//!
//! Each fetch produces its own [`SampleAttempt`]; a failed fetch never aborts
//! the loop, and only collected attempts feed the analyses.

use crate::api::DataProvider;
use crate::domain::{AccountId, MatchId, MatchRecord, PlayerDetail};
use crate::error::AppError;
use indicatif::ProgressBar;
use tracing::{debug, warn};

/// Upper bound on detail fetches per analysis.
pub const DETAIL_SAMPLE_LIMIT: usize = 10;

#[derive(Debug)]
pub enum SampleAttempt {
    Collected(PlayerDetail),
    /// The match loaded but the player was not in it.
    Missing { match_id: MatchId },
    Failed { match_id: MatchId, error: AppError },
}

impl SampleAttempt {
    pub fn collected(&self) -> Option<&PlayerDetail> {
        match self {
            SampleAttempt::Collected(detail) => Some(detail),
            _ => None,
        }
    }
}

/// A sampled match that contributed nothing, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedMatch {
    pub match_id: MatchId,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Sample {
    pub attempts: Vec<SampleAttempt>,
}

impl Sample {
    /// Successful attempts in fetch order.
    pub fn details(&self) -> Vec<PlayerDetail> {
        self.attempts
            .iter()
            .filter_map(SampleAttempt::collected)
            .cloned()
            .collect()
    }

    /// Missing and failed attempts in fetch order.
    pub fn skipped(&self) -> Vec<SkippedMatch> {
        self.attempts
            .iter()
            .filter_map(|attempt| match attempt {
                SampleAttempt::Collected(_) => None,
                SampleAttempt::Missing { match_id } => Some(SkippedMatch {
                    match_id: *match_id,
                    reason: "player not in match".to_string(),
                }),
                SampleAttempt::Failed { match_id, error } => Some(SkippedMatch {
                    match_id: *match_id,
                    reason: error.to_string(),
                }),
            })
            .collect()
    }
}

/// Fetches details for up to [`DETAIL_SAMPLE_LIMIT`] of the given matches, one at a time.
pub fn sample_details(
    provider: &impl DataProvider,
    account_id: AccountId,
    matches: &[MatchRecord],
    progress: &ProgressBar,
) -> Sample {
    let mut attempts = Vec::new();

    for record in matches.iter().take(DETAIL_SAMPLE_LIMIT) {
        let attempt = match provider.fetch_match_detail(record.match_id) {
            Ok(detail) => match detail.player(account_id) {
                Some(player) => SampleAttempt::Collected(player.clone()),
                None => {
                    debug!(match_id = record.match_id, account_id, "Player not found in match");
                    SampleAttempt::Missing {
                        match_id: record.match_id,
                    }
                }
            },
            Err(error) => {
                warn!(match_id = record.match_id, %error, "Failed to fetch match, skipping");
                SampleAttempt::Failed {
                    match_id: record.match_id,
                    error,
                }
            }
        };
        attempts.push(attempt);
        progress.inc(1);
    }

    Sample { attempts }
}
