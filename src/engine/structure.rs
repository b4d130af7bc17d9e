//! Structure Converter
//!
//! Bidirectional mapping between the project's named regions and the
//! items of one designated structure track. Encoding gives each region an
//! item whose start is the region start, whose length runs to the next
//! region's start (the last region gets the configured tail), and whose
//! sole text event at offset 0 carries the name. Decoding reads each
//! item's leading text event back into a marker; items without one and
//! duplicate names are skipped per-marker with warnings.

use std::collections::HashSet;

use crate::engine::summary::Warning;
use crate::model::{Event, Item, Region, StructureMarker, Ticks, Track};

/// Build the structure track's replacement items from the region list.
///
/// Regions are processed sorted by start position; the caller replaces the
/// track's items wholesale with the result.
pub fn encode_regions(regions: &[Region], tail_ticks: Ticks) -> Vec<Item> {
    let mut sorted: Vec<&Region> = regions.iter().collect();
    sorted.sort_by_key(|r| r.start);

    let mut items = Vec::with_capacity(sorted.len());
    for (i, region) in sorted.iter().enumerate() {
        let length = match sorted.get(i + 1) {
            Some(next) => next.start.saturating_sub(region.start).max(1),
            None => tail_ticks,
        };
        let mut item = Item::new(region.start, length);
        item.name = Some(region.name.clone());
        item.color = region.color;
        item.events.push(Event::text(region.name.clone(), 0));
        items.push(item);
    }
    items
}

/// Decode the structure track's items into markers.
///
/// Markers come back sorted by position. Failing items produce warnings,
/// never errors: a marker set with holes is still a usable structure.
pub fn decode_markers(track: &Track) -> (Vec<StructureMarker>, Vec<Warning>) {
    let mut warnings = Vec::new();

    let mut decoded: Vec<StructureMarker> = Vec::with_capacity(track.items.len());
    for item in &track.items {
        match item.leading_text() {
            Some(name) => decoded.push(StructureMarker {
                position: item.start,
                name: name.to_string(),
                color: item.color,
            }),
            None => warnings.push(Warning::MarkerWithoutName {
                position: item.start,
            }),
        }
    }
    decoded.sort_by_key(|m| m.position);

    // uniqueness: first occurrence of a name wins, duplicates are skipped
    let mut seen = HashSet::new();
    let mut markers = Vec::with_capacity(decoded.len());
    for marker in decoded {
        if seen.insert(marker.name.clone()) {
            markers.push(marker);
        } else {
            warnings.push(Warning::DuplicateMarkerName {
                name: marker.name.clone(),
                position: marker.position,
            });
        }
    }

    (markers, warnings)
}

/// Build the replacement region list from decoded markers.
///
/// Consecutive markers bound each region; the final region extends to
/// `tail_end`, the end of the last structure item.
pub fn markers_to_regions(markers: &[StructureMarker], tail_end: Ticks) -> Vec<Region> {
    let mut regions = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let end = match markers.get(i + 1) {
            Some(next) => next.position,
            None => tail_end.max(marker.position + 1),
        };
        regions.push(Region {
            name: marker.name.clone(),
            start: marker.position,
            end,
            color: marker.color,
        });
    }
    regions
}

/// End of the last structure item, used as the final region's end.
pub fn track_end(track: &Track) -> Ticks {
    track.items.iter().map(Item::end).max().unwrap_or(0)
}
