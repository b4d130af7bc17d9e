//! Integration Tests
//!
//! End-to-end tests for the three pipelines, running against the in-memory
//! host with MIDI fixture files written through `midly`.

use std::path::PathBuf;

use midly::num::{u15, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use scorelink::config::Config;
use scorelink::engine::{
    import_and_replace, normalize_voice_tracks, regions_to_structure, structure_to_regions,
    ExclusionRule, MatchSpec, NormalizeOptions,
};
use scorelink::host::{MemoryHost, ProjectSnapshot};
use scorelink::model::{ControllerKind, Event, Item, Region, Track};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// === Fixture helpers ===

fn meta(delta: u32, message: MetaMessage<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(message),
    }
}

fn note_on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(vel),
            },
        },
    }
}

fn note_off(delta: u32, key: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            },
        },
    }
}

/// Write a two-track ("Bass", "Drums") MIDI file and return its path.
fn write_source_file(dir: &TempDir) -> PathBuf {
    let smf = Smf {
        header: Header::new(Format::Parallel, Timing::Metrical(u15::new(480))),
        tracks: vec![
            vec![
                meta(0, MetaMessage::TrackName(b"Bass")),
                note_on(0, 36, 100),
                note_off(480, 36),
                meta(0, MetaMessage::EndOfTrack),
            ],
            vec![
                meta(0, MetaMessage::TrackName(b"Drums")),
                note_on(0, 42, 110),
                note_off(240, 42),
                note_on(240, 38, 110),
                note_off(240, 38),
                meta(0, MetaMessage::EndOfTrack),
            ],
        ],
    };
    let path = dir.path().join("score.mid");
    smf.save(&path).unwrap();
    path
}

fn voice_project() -> ProjectSnapshot {
    let mut old_item = Item::new(0, 960);
    old_item.name = Some("stale".to_string());
    ProjectSnapshot {
        tracks: vec![
            Track::new(0, "V_Bass").with_items(vec![old_item]),
            Track::new(1, "V_Drums"),
            Track::new(2, "V_Extra"),
            Track::new(3, "Click"),
        ],
        regions: Vec::new(),
    }
}

// === Import ===

#[test]
fn test_import_matches_prefixed_tracks_and_reports_unmatched() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = write_source_file(&dir);
    let mut host = MemoryHost::new(voice_project());

    let summary = import_and_replace(
        &mut host,
        &path,
        &MatchSpec::Prefix("V_".to_string()),
        &[],
    )
    .unwrap();

    assert_eq!(summary.imported_items, 2);
    assert_eq!(summary.rejected_items, 0);
    assert_eq!(summary.unmatched_tracks, vec!["V_Extra".to_string()]);

    let project = host.project();
    // replaced wholesale: the stale item is gone
    assert_eq!(project.tracks[0].items.len(), 1);
    assert_eq!(project.tracks[0].items[0].name.as_deref(), Some("Bass"));
    assert_eq!(project.tracks[1].items.len(), 1);
    // unmatched and unqualified tracks untouched
    assert!(project.tracks[2].items.is_empty());
    assert!(project.tracks[3].items.is_empty());
}

#[test]
fn test_import_preserves_source_timing() {
    let dir = TempDir::new().unwrap();
    let path = write_source_file(&dir);
    let mut host = MemoryHost::new(voice_project());

    import_and_replace(&mut host, &path, &MatchSpec::Prefix("V_".to_string()), &[]).unwrap();

    let drums = &host.project().tracks[1].items[0];
    assert_eq!(
        drums.events,
        vec![Event::note(42, 110, 0, 240), Event::note(38, 110, 480, 240)]
    );
}

#[test]
fn test_import_missing_file_is_fatal_and_writes_nothing() {
    let mut host = MemoryHost::new(voice_project());
    let before = host.project().clone();

    let err = import_and_replace(
        &mut host,
        &PathBuf::from("/nonexistent/score.mid"),
        &MatchSpec::Prefix("V_".to_string()),
        &[],
    )
    .unwrap_err();

    assert_eq!(err.error_code(), "SOURCE_UNAVAILABLE");
    assert!(err.aborted_before_write());
    assert_eq!(host.project(), &before);
}

#[test]
fn test_import_filtering_totality() {
    let dir = TempDir::new().unwrap();
    let path = write_source_file(&dir);
    let mut host = MemoryHost::new(voice_project());
    let rules = vec![ExclusionRule::NameMatches(vec!["Bass".to_string()])];

    let summary = import_and_replace(
        &mut host,
        &path,
        &MatchSpec::Prefix("V_".to_string()),
        &rules,
    )
    .unwrap();

    // the Bass item was rejected; the track is cleared, run still succeeds
    assert_eq!(summary.rejected_items, 1);
    assert!(host.project().tracks[0].items.is_empty());
    // no surviving item matches any rule
    for track in &host.project().tracks {
        for item in &track.items {
            assert!(rules.iter().all(|rule| !rule.excludes(item)));
        }
    }
}

// === Structure conversion ===

fn structure_project() -> ProjectSnapshot {
    ProjectSnapshot {
        tracks: vec![Track::new(0, "V_Bass"), Track::new(1, "STRUCTURE")],
        regions: vec![
            Region::new("Intro", 0, 16),
            Region::new("Verse", 16, 48),
            Region::new("Chorus", 48, 64),
        ],
    }
}

#[test]
fn test_regions_to_structure_creates_one_item_per_region() {
    init_logging();
    let mut host = MemoryHost::new(structure_project());

    let summary = regions_to_structure(&mut host, "STRUCTURE", 16).unwrap();
    assert_eq!(summary.created_items, 3);

    let items = &host.project().tracks[1].items;
    assert_eq!(items[0].leading_text(), Some("Intro"));
    assert_eq!(items[1].leading_text(), Some("Verse"));
    assert_eq!(items[2].leading_text(), Some("Chorus"));
    assert_eq!((items[2].start, items[2].length), (48, 16));
}

#[test]
fn test_structure_round_trip_reproduces_regions() {
    let mut host = MemoryHost::new(structure_project());
    let original = host.project().regions.clone();

    regions_to_structure(&mut host, "STRUCTURE", 16).unwrap();
    let summary = structure_to_regions(&mut host, "STRUCTURE").unwrap();

    assert_eq!(summary.created_regions, 3);
    assert!(summary.skipped_markers.is_empty());

    let restored = &host.project().regions;
    for (orig, back) in original.iter().zip(restored) {
        assert_eq!(orig.name, back.name);
        assert_eq!(orig.start, back.start);
    }
    // only the final region's end may differ; here the tail matches it
    assert_eq!(restored[2].end, 64);
}

#[test]
fn test_structure_to_regions_skips_bad_markers() {
    let mut duplicate = Item::new(80, 16);
    duplicate.events.push(Event::text("Intro", 0));
    let mut named = Item::new(0, 16);
    named.events.push(Event::text("Intro", 0));

    let mut host = MemoryHost::new(ProjectSnapshot {
        tracks: vec![Track::new(0, "STRUCTURE").with_items(vec![
            named,
            Item::new(16, 16), // no text event
            duplicate,
        ])],
        regions: Vec::new(),
    });

    let summary = structure_to_regions(&mut host, "STRUCTURE").unwrap();
    assert_eq!(summary.created_regions, 1);
    assert_eq!(
        summary.skipped_markers,
        vec!["(unnamed item at 16)".to_string(), "Intro".to_string()]
    );
}

#[test]
fn test_missing_structure_track_is_fatal() {
    let mut host = MemoryHost::new(voice_project());
    let err = regions_to_structure(&mut host, "STRUCTURE", 16).unwrap_err();
    assert_eq!(err.error_code(), "TRACK_NOT_FOUND");
    let err = structure_to_regions(&mut host, "STRUCTURE").unwrap_err();
    assert_eq!(err.error_code(), "TRACK_NOT_FOUND");
}

// === Normalization ===

fn project_with_notes() -> ProjectSnapshot {
    let mut item = Item::new(0, 1920);
    item.events = vec![
        Event::note(60, 37, 113, 55),
        Event::note(62, 120, 247, 119),
        Event::control(ControllerKind::ReverbSend, 64, 0),
        Event::control(ControllerKind::Sustain, 127, 300),
    ];
    ProjectSnapshot {
        tracks: vec![
            Track::new(0, "V_Alto").with_items(vec![item.clone()]),
            Track::new(1, "Percussion").with_items(vec![item]),
        ],
        regions: Vec::new(),
    }
}

#[test]
fn test_normalize_velocity_totality_on_selected_tracks_only() {
    init_logging();
    let mut host = MemoryHost::new(project_with_notes());
    let options = NormalizeOptions::new("V_", 96, 120);

    let summary = normalize_voice_tracks(&mut host, &options).unwrap();
    assert_eq!(summary.normalized_items, 1);

    for event in &host.project().tracks[0].items[0].events {
        if let Event::Note(note) = event {
            assert_eq!(note.velocity, 96);
        }
    }
    // non-prefixed track untouched, ambience CC still there
    assert!(host.project().tracks[1].items[0]
        .events
        .iter()
        .any(|e| matches!(e, Event::Control(c) if c.kind == ControllerKind::ReverbSend)));
}

#[test]
fn test_normalize_is_idempotent_across_runs() {
    let mut host = MemoryHost::new(project_with_notes());
    let options = NormalizeOptions::new("V_", 96, 120);

    normalize_voice_tracks(&mut host, &options).unwrap();
    let once = host.project().clone();
    normalize_voice_tracks(&mut host, &options).unwrap();

    assert_eq!(host.project(), &once);
}

#[test]
fn test_normalize_rejects_zero_grid_and_writes_nothing() {
    let mut host = MemoryHost::new(project_with_notes());
    let before = host.project().clone();
    let options = NormalizeOptions::new("V_", 96, 0);

    let err = normalize_voice_tracks(&mut host, &options).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.aborted_before_write());
    assert_eq!(host.project(), &before);
}

#[test]
fn test_normalize_rejects_zero_duration_grid() {
    let mut host = MemoryHost::new(project_with_notes());
    let mut options = NormalizeOptions::new("V_", 96, 120);
    options.duration_grid_ticks = 0;

    let err = normalize_voice_tracks(&mut host, &options).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_operations_address_tracks_by_position_not_index_field() {
    // a host whose stored index fields drifted from list positions
    let mut project = voice_project();
    for track in &mut project.tracks {
        track.index = 0;
    }
    let dir = TempDir::new().unwrap();
    let path = write_source_file(&dir);
    let mut host = MemoryHost::new(project);

    import_and_replace(&mut host, &path, &MatchSpec::Prefix("V_".to_string()), &[]).unwrap();

    // items landed on the tracks they were matched to, not on track 0
    assert_eq!(
        host.project().tracks[0].items[0].name.as_deref(),
        Some("Bass")
    );
    assert_eq!(
        host.project().tracks[1].items[0].name.as_deref(),
        Some("Drums")
    );
    assert!(host.project().tracks[3].items.is_empty());
}

#[test]
fn test_normalize_reports_boundary_warnings() {
    let mut item = Item::new(0, 240);
    item.events = vec![Event::note(60, 100, 230, 200)];
    let mut host = MemoryHost::new(ProjectSnapshot {
        tracks: vec![Track::new(0, "V_Alto").with_items(vec![item])],
        regions: Vec::new(),
    });

    let summary =
        normalize_voice_tracks(&mut host, &NormalizeOptions::new("V_", 96, 120)).unwrap();
    assert_eq!(summary.warnings.len(), 1);
    // item boundaries untouched
    assert_eq!(host.project().tracks[0].items[0].length, 240);
}

// === Config-driven flow ===

#[test]
fn test_config_drives_import_and_normalize() {
    let dir = TempDir::new().unwrap();
    let path = write_source_file(&dir);
    let config = Config::parse(&format!(
        "import_source_file_path = {}\n\
         track_name_prefix = V_\n\
         default_velocity = 80\n\
         quantize_grid_ticks = 240\n",
        path.display()
    ))
    .unwrap();

    let mut host = MemoryHost::new(voice_project());
    let spec = config.match_spec().unwrap();
    let rules = config.exclusion_rules();
    import_and_replace(&mut host, config.source_path().unwrap(), &spec, &rules).unwrap();

    let options = config.normalize_options().unwrap();
    normalize_voice_tracks(&mut host, &options).unwrap();

    for event in &host.project().tracks[0].items[0].events {
        if let Event::Note(note) = event {
            assert_eq!(note.velocity, 80);
            assert_eq!(note.start % 240, 0);
        }
    }
}
