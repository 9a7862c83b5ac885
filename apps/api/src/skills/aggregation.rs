//! Market-demand aggregation: sums related-skill scores across one taxonomy query
//! per input skill and returns the top-N names.

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::skills::normalize::skill_key;
use crate::skills::taxonomy::{RelatedSkill, SkillsTaxonomy};

/// Contribution of a candidate that came back without a score.
pub const UNIT_WEIGHT: f64 = 1.0;

/// Request-scoped accumulator. Keys are case-insensitive; the first-seen spelling is
/// reported. Insertion order is the tie-breaker for equal totals.
#[derive(Debug, Default)]
pub struct AggregatedScore {
    totals: IndexMap<String, (String, f64)>,
}

impl AggregatedScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, score: Option<f64>) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let contribution = score.filter(|s| s.is_finite()).unwrap_or(UNIT_WEIGHT);
        self.totals
            .entry(skill_key(name))
            .or_insert_with(|| (name.to_string(), 0.0))
            .1 += contribution;
    }

    pub fn extend(&mut self, candidates: &[RelatedSkill]) {
        for candidate in candidates {
            self.add(&candidate.name, candidate.score);
        }
    }

    pub fn total(&self, name: &str) -> Option<f64> {
        self.totals.get(&skill_key(name)).map(|(_, total)| *total)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Descending by total; `sort_by` is stable, so ties keep first-seen order.
    pub fn top_n(self, n: usize) -> Vec<String> {
        let mut ranked: Vec<(String, f64)> = self.totals.into_values().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.into_iter().take(n).map(|(name, _)| name).collect()
    }
}

/// Queries the taxonomy once per skill. A failed query counts as zero results; an
/// unreachable service or no matches yields an empty list.
pub async fn aggregate_related_skills(
    taxonomy: &dyn SkillsTaxonomy,
    skills: &[String],
    top_n: usize,
) -> Vec<String> {
    if !taxonomy.is_enabled() || skills.is_empty() {
        return Vec::new();
    }

    let mut scores = AggregatedScore::new();
    for skill in skills {
        match taxonomy.search(skill).await {
            Ok(candidates) => scores.extend(&candidates),
            Err(e) => warn!(skill = %skill, error = %e, "Taxonomy search failed; skipping skill"),
        }
    }

    if scores.is_empty() {
        return Vec::new();
    }

    let ranked = scores.top_n(top_n);
    info!("Aggregated {} related skills from {} queries", ranked.len(), skills.len());
    ranked
}
