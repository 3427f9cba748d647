//! Relationship analysis
//!
//! Centrality of a position is the number of distinct paths referencing it.
//! Relationship strength between two paths is the number of positions they
//! share. Both come from a single grouping of the detail rows by position.

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, span, trace, Level};

use crate::core::{group_by, PositionDetail};

/// Centrality scores and the symmetric path relationship matrix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    centrality: HashMap<String, usize>,
    strengths: HashMap<String, HashMap<String, usize>>,
}

impl Relationships {
    /// Number of distinct paths referencing `position_id` (0 when unknown)
    pub fn centrality(&self, position_id: &str) -> usize {
        self.centrality.get(position_id).copied().unwrap_or(0)
    }

    /// Number of positions shared by two paths (0 when unrelated or equal)
    pub fn strength(&self, path_a: &str, path_b: &str) -> usize {
        self.strengths
            .get(path_a)
            .and_then(|row| row.get(path_b))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_interchange(&self, position_id: &str) -> bool {
        self.centrality(position_id) > 1
    }

    pub fn centrality_scores(&self) -> &HashMap<String, usize> {
        &self.centrality
    }

    /// Paths sharing at least one position with `path_id`
    pub fn related_paths<'a>(&'a self, path_id: &str) -> impl Iterator<Item = (&'a str, usize)> {
        self.strengths
            .get(path_id)
            .into_iter()
            .flat_map(|row| row.iter().map(|(id, count)| (id.as_str(), *count)))
    }
}

/// Compute centrality and relationship strengths from raw detail rows
pub fn analyze(details: &[PositionDetail]) -> Relationships {
    let analyze_span = span!(Level::DEBUG, "analyze_relationships", detail_count = details.len());
    let _enter = analyze_span.enter();

    let by_position = group_by(details, |d| d.position_id.clone());

    let mut centrality = HashMap::with_capacity(by_position.len());
    let mut strengths: HashMap<String, HashMap<String, usize>> = HashMap::new();

    for (position_id, rows) in by_position.iter() {
        // A position listed twice in one path still counts once for it
        let paths: BTreeSet<&str> = rows.iter().map(|d| d.career_path_id.as_str()).collect();
        centrality.insert(position_id.clone(), paths.len());
        trace!(position_id = position_id.as_str(), paths = paths.len(), "Position centrality");

        let paths: Vec<&str> = paths.into_iter().collect();
        for (i, a) in paths.iter().enumerate() {
            for b in &paths[i + 1..] {
                *strengths
                    .entry(a.to_string())
                    .or_default()
                    .entry(b.to_string())
                    .or_default() += 1;
                *strengths
                    .entry(b.to_string())
                    .or_default()
                    .entry(a.to_string())
                    .or_default() += 1;
            }
        }
    }

    debug!(
        positions = centrality.len(),
        related_paths = strengths.len(),
        "Relationship analysis completed"
    );

    Relationships {
        centrality,
        strengths,
    }
}
