use crate::engine::{ReviewQuery, ScoredReviewer, ScoringEngine};
use crate::Result;
use rand::Rng;
use reviewer_roster::ReviewerRecord;

/// Order by `total_score` then `random_tiebreak`, both descending, and keep
/// the first `count`. A `count` of zero yields an empty list.
pub fn rank(mut scored: Vec<ScoredReviewer>, count: usize) -> Vec<ScoredReviewer> {
    scored.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| b.record.random_tiebreak.total_cmp(&a.record.random_tiebreak))
    });
    scored.truncate(count);
    scored
}

/// Display-only scale: each total divided by the best total when that is
/// positive. Expects `ranked` in [`rank`] order.
pub fn relative_scores(ranked: &[ScoredReviewer]) -> Vec<f64> {
    let best = ranked.first().map_or(0.0, |s| s.total_score);
    ranked
        .iter()
        .map(|s| {
            if best > 0.0 {
                s.total_score / best
            } else {
                s.total_score
            }
        })
        .collect()
}

/// Score-then-rank pipeline for one request
#[derive(Debug, Clone, Default)]
pub struct Shortlister {
    engine: ScoringEngine,
}

impl Shortlister {
    pub const fn new(engine: ScoringEngine) -> Self {
        Self { engine }
    }

    /// Draw a fresh tiebreak per reviewer from `rng`, score, and rank.
    ///
    /// The roster itself is left untouched.
    pub fn shortlist<R: Rng>(
        &self,
        roster: &[ReviewerRecord],
        query: &ReviewQuery,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<ScoredReviewer>> {
        let drawn: Vec<ReviewerRecord> = roster
            .iter()
            .map(|record| record.clone().with_tiebreak(rng.gen::<f64>()))
            .collect();
        let scored = self.engine.score(&drawn, query)?;
        let passing = scored.len();
        let ranked = rank(scored, count);
        log::debug!("Ranked {} of {passing} matching reviewers", ranked.len());
        Ok(ranked)
    }
}
