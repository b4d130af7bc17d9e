//! The three transformation pipelines
//!
//! Each entry point is one user-triggered action: read a fresh project
//! snapshot through the host, transform it fully in memory, then apply a
//! single write batch. A fatal error anywhere before the apply step leaves
//! the project exactly as it was; non-fatal conditions accumulate into the
//! returned summary.

mod import;
mod matcher;
mod normalize;
mod structure;
mod summary;

pub use import::{filter_items, ExclusionRule, FilteredItems};
pub use matcher::{match_tracks, MatchReport, MatchSpec, TrackMatch};
pub use normalize::{normalize_item, NormalizeOptions};
pub use structure::{decode_markers, encode_regions, markers_to_regions};
pub use summary::{ImportSummary, NormalizeSummary, RegionSummary, StructureSummary, Warning};

use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Result, SyncError};
use crate::host::{HostAdapter, WriteBatch};
use crate::model::Ticks;
use crate::smf;

/// Replace matched project tracks' items with filtered source-file items.
///
/// Matched tracks are replaced wholesale; unmatched tracks are reported
/// and left untouched. A missing or malformed source file fails the whole
/// operation before anything is written.
pub fn import_and_replace(
    host: &mut dyn HostAdapter,
    source_path: &Path,
    spec: &MatchSpec,
    rules: &[ExclusionRule],
) -> Result<ImportSummary> {
    info!("importing {}", source_path.display());
    let source = smf::read_file(source_path)?;
    let project = host.read_project()?;

    let report = match_tracks(&project.tracks, &source.tracks, spec);
    for name in &report.unmatched {
        warn!("no source track for `{name}`; left untouched");
    }

    let mut summary = ImportSummary {
        unmatched_tracks: report.unmatched,
        ..ImportSummary::default()
    };
    let mut batch = WriteBatch::new();
    for pair in &report.pairs {
        let Some(source_index) = pair.source_index else {
            continue;
        };
        let filtered = filter_items(&source.tracks[source_index], rules);
        debug!(
            "`{}`: {} items imported, {} rejected",
            project.tracks[pair.project_index].name,
            filtered.accepted.len(),
            filtered.rejected
        );
        summary.imported_items += filtered.accepted.len();
        summary.rejected_items += filtered.rejected;
        batch.replace_track_items(pair.project_index, filtered.accepted);
    }

    host.apply(batch)?;
    info!(
        "import done: {} items written, {} rejected, {} unmatched tracks",
        summary.imported_items,
        summary.rejected_items,
        summary.unmatched_tracks.len()
    );
    Ok(summary)
}

/// Encode the project's regions as items on the structure track.
///
/// The structure track's previous items are replaced wholesale.
pub fn regions_to_structure(
    host: &mut dyn HostAdapter,
    structure_track_name: &str,
    tail_ticks: Ticks,
) -> Result<StructureSummary> {
    info!("encoding regions onto `{structure_track_name}`");
    let project = host.read_project()?;
    let position = project
        .track_position(structure_track_name)
        .ok_or_else(|| SyncError::TrackNotFound {
            name: structure_track_name.to_string(),
        })?;

    let items = encode_regions(&project.regions, tail_ticks);
    let created = items.len();

    let mut batch = WriteBatch::new();
    batch.replace_track_items(position, items);
    host.apply(batch)?;

    info!("created {created} structure items");
    Ok(StructureSummary {
        created_items: created,
    })
}

/// Decode the structure track's items back into the project's regions.
///
/// The project's region list is replaced wholesale. Items that fail to
/// decode are skipped and reported, never fatal.
pub fn structure_to_regions(
    host: &mut dyn HostAdapter,
    structure_track_name: &str,
) -> Result<RegionSummary> {
    info!("decoding regions from `{structure_track_name}`");
    let project = host.read_project()?;
    let track = project
        .track_by_name(structure_track_name)
        .ok_or_else(|| SyncError::TrackNotFound {
            name: structure_track_name.to_string(),
        })?;

    let (markers, warnings) = decode_markers(track);
    for warning in &warnings {
        warn!("{warning}");
    }
    let regions = markers_to_regions(&markers, structure::track_end(track));
    let created = regions.len();

    let mut batch = WriteBatch::new();
    batch.replace_regions(regions);
    host.apply(batch)?;

    info!("created {created} regions, skipped {} markers", warnings.len());
    Ok(RegionSummary {
        created_regions: created,
        skipped_markers: warnings.iter().filter_map(Warning::marker_name).collect(),
    })
}

/// Canonicalize every item on the prefix-selected voice tracks.
///
/// Rewrites items in place per [`NormalizeOptions`]; item boundaries are
/// never altered, and notes pushed past them come back as warnings.
pub fn normalize_voice_tracks(
    host: &mut dyn HostAdapter,
    options: &NormalizeOptions,
) -> Result<NormalizeSummary> {
    options.validate()?;
    info!("normalizing voice tracks with prefix `{}`", options.prefix);
    let project = host.read_project()?;

    let mut summary = NormalizeSummary::default();
    let mut batch = WriteBatch::new();
    for (position, track) in project.tracks.iter().enumerate() {
        if !track.name.starts_with(options.prefix.as_str()) {
            continue;
        }
        let mut items = track.items.clone();
        for item in &mut items {
            summary
                .warnings
                .extend(normalize_item(item, options, &track.name));
            summary.normalized_items += 1;
        }
        debug!("normalized {} items on `{}`", items.len(), track.name);
        batch.replace_track_items(position, items);
    }

    for warning in &summary.warnings {
        warn!("{warning}");
    }
    host.apply(batch)?;
    info!(
        "normalized {} items, {} warnings",
        summary.normalized_items,
        summary.warnings.len()
    );
    Ok(summary)
}
