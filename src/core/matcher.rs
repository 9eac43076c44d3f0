use std::collections::HashSet;
use crate::models::{CandidateRecord, Requester, ScoredMatch, ScoringWeights, SkippedRecord};
use crate::core::{
    filters::{is_complementary, is_excluded},
    normalize::validate_candidate,
    scoring::calculate_match_score,
};

/// Result of the ranking process
///
/// Internal to the service; `MatchesResponse` is the wire shape.
#[derive(Debug, Clone, Default)]
pub struct RankingResult {
    pub matches: Vec<ScoredMatch>,
    pub total_candidates: usize,
    /// Malformed or duplicate records left out of the ranking
    pub skipped: Vec<SkippedRecord>,
}

impl RankingResult {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Match ranking engine
///
/// # Pipeline Stages
/// 1. Exclusion of the requester and explicitly excluded ids
/// 2. Record validation (malformed records are skipped and reported)
/// 3. Complementary-skill eligibility filter
/// 4. Scoring and ranking
///
/// Ranking is a pure function of its inputs. The same requester and pool
/// always produce the same ordering.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank a candidate pool for a requester
    pub fn rank(&self, requester: &Requester, candidates: &[CandidateRecord]) -> RankingResult {
        self.rank_excluding(requester, candidates, &[])
    }

    /// Rank a candidate pool, leaving out `exclude_ids`
    ///
    /// # Returns
    /// Complementary candidates sorted by score (descending), then by id
    /// (ascending). A requester without both an offer and a want gets an
    /// empty result.
    pub fn rank_excluding(
        &self,
        requester: &Requester,
        candidates: &[CandidateRecord],
        exclude_ids: &[String],
    ) -> RankingResult {
        let total_candidates = candidates.len();

        let (Some(offer), Some(want)) = (requester.offer.as_ref(), requester.want.as_ref()) else {
            tracing::debug!("Requester {:?} has no complete skill pair, nothing to rank", requester.id);
            return RankingResult {
                total_candidates,
                ..RankingResult::default()
            };
        };

        let mut seen_ids = HashSet::new();
        let mut skipped = Vec::new();
        let mut scored_matches = Vec::new();

        for record in candidates {
            // Stage 1: exclusions, checked on the raw id
            if record
                .id
                .as_deref()
                .is_some_and(|id| is_excluded(id, requester.id.as_deref(), exclude_ids))
            {
                continue;
            }

            // Stage 2: validation
            let candidate = match validate_candidate(record) {
                Ok(candidate) => candidate,
                Err(e) => {
                    tracing::warn!("Skipping malformed candidate {:?}: {}", record.id, e);
                    skipped.push(SkippedRecord {
                        user_id: record.id.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !seen_ids.insert(candidate.id.clone()) {
                tracing::warn!("Skipping duplicate candidate {}", candidate.id);
                skipped.push(SkippedRecord {
                    user_id: Some(candidate.id),
                    reason: "duplicate candidate id".to_string(),
                });
                continue;
            }

            // Stage 3: both directions must line up
            if !is_complementary(offer, want, &candidate) {
                continue;
            }

            // Stage 4: scoring
            let (match_score, level_score) =
                calculate_match_score(offer, want, &candidate, &self.weights);

            scored_matches.push(ScoredMatch {
                user_id: candidate.id,
                name: candidate.name,
                avatar: candidate.avatar,
                skill_offered: candidate.offer.name,
                offered_level: candidate.offer.level,
                skill_wanted: candidate.want.name,
                wanted_level: candidate.want.level,
                trust_score: candidate.trust_score,
                level_score,
                match_score,
            });
        }

        // Sort by score (descending) and then by id (ascending)
        scored_matches.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        tracing::debug!(
            "Ranked {} of {} candidates ({} skipped)",
            scored_matches.len(),
            total_candidates,
            skipped.len()
        );

        RankingResult {
            matches: scored_matches,
            total_candidates,
            skipped,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
