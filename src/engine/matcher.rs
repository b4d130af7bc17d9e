//! Track Matcher
//!
//! Resolves which project tracks correspond to which source-file tracks.
//! Matching is a pure function over the two track lists: the source side is
//! indexed once into a lookup table, then each project track is resolved
//! against it. The same inputs always produce the same pairing; when
//! several source tracks share a name, declaration order wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Track;

/// How project tracks are selected and keyed for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchSpec {
    /// Select tracks whose name starts with this prefix (case-sensitive);
    /// the remainder of the name is the voice identifier looked up among
    /// source track names.
    Prefix(String),
    /// Explicit (project track name, source track name) pairs.
    Table(Vec<(String, String)>),
}

/// One resolved pairing; `source_index` is `None` for an unmatched track.
///
/// Both indexes are positions within the track lists handed to
/// [`match_tracks`], not the snapshot's stored `Track::index` fields —
/// names are the only track identity this engine trusts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMatch {
    pub project_index: usize,
    pub source_index: Option<usize>,
}

/// The full matching result, in project track order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub pairs: Vec<TrackMatch>,
    /// Names of qualifying project tracks with no source counterpart.
    pub unmatched: Vec<String>,
}

/// Index of source tracks by name, built once per invocation.
struct SourceIndex {
    exact: HashMap<String, usize>,
    folded: HashMap<String, usize>,
}

impl SourceIndex {
    fn build(sources: &[Track]) -> Self {
        let mut exact = HashMap::new();
        let mut folded = HashMap::new();
        for (index, track) in sources.iter().enumerate() {
            // first declaration wins on duplicate names
            exact.entry(track.name.clone()).or_insert(index);
            folded.entry(track.name.to_lowercase()).or_insert(index);
        }
        SourceIndex { exact, folded }
    }

    /// Exact lookup first, then case-insensitive fallback.
    fn resolve(&self, voice: &str) -> Option<usize> {
        self.exact
            .get(voice)
            .or_else(|| self.folded.get(&voice.to_lowercase()))
            .copied()
    }
}

/// Match project tracks against source tracks under the given spec.
pub fn match_tracks(project: &[Track], sources: &[Track], spec: &MatchSpec) -> MatchReport {
    let index = SourceIndex::build(sources);
    let mut report = MatchReport::default();

    for (position, track) in project.iter().enumerate() {
        let voice = match spec {
            MatchSpec::Prefix(prefix) => match track.name.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.to_string(),
                None => continue,
            },
            MatchSpec::Table(table) => match table
                .iter()
                .find(|(project_name, _)| *project_name == track.name)
            {
                Some((_, source_name)) => source_name.clone(),
                None => continue,
            },
        };

        let source_index = index.resolve(&voice);
        if source_index.is_none() {
            report.unmatched.push(track.name.clone());
        }
        report.pairs.push(TrackMatch {
            project_index: position,
            source_index,
        });
    }

    report
}
