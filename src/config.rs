//! Configuration surface
//!
//! The host supplies options through a simple line-oriented file format:
//! `key = value` pairs, `#`-prefixed comments, blank lines ignored. The
//! parsed [`Config`] is validated up front so that every operation either
//! starts with known-good options or fails with a `Config` error before
//! touching the project.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{ExclusionRule, MatchSpec, NormalizeOptions};
use crate::error::{Result, SyncError};
use crate::model::Ticks;

/// Fallback velocity written by normalization when none is configured.
pub const DEFAULT_VELOCITY: u8 = 96;
/// Fallback quantization grid: an eighth note at 480 ticks per quarter.
pub const DEFAULT_GRID_TICKS: Ticks = 240;
/// Fallback structure track name.
pub const DEFAULT_STRUCTURE_TRACK: &str = "STRUCTURE";
/// Fallback tail length for the final structure item: two 4/4 bars.
pub const DEFAULT_TAIL_TICKS: Ticks = 3840;

/// Typed engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External MIDI file read by import; required only for import.
    pub import_source_file_path: Option<PathBuf>,
    /// Name prefix selecting voice tracks; required by import and
    /// normalization.
    pub track_name_prefix: Option<String>,
    /// Substrings excluding source items by name.
    pub excluded_item_name_patterns: Vec<String>,
    /// Velocity written onto every note by normalization (0-127).
    pub default_velocity: u8,
    /// Grid for note-start quantization, in ticks.
    pub quantize_grid_ticks: Ticks,
    /// Grid for duration quantization; defaults to the start grid.
    pub duration_grid_ticks: Option<Ticks>,
    /// Exact name of the designated structure track.
    pub structure_track_name: String,
    /// Length given to the final structure item, in ticks.
    pub structure_tail_ticks: Ticks,
    /// Extra CC numbers stripped alongside the ambience sends.
    pub extra_ambience_controllers: Vec<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            import_source_file_path: None,
            track_name_prefix: None,
            excluded_item_name_patterns: Vec::new(),
            default_velocity: DEFAULT_VELOCITY,
            quantize_grid_ticks: DEFAULT_GRID_TICKS,
            duration_grid_ticks: None,
            structure_track_name: DEFAULT_STRUCTURE_TRACK.to_string(),
            structure_tail_ticks: DEFAULT_TAIL_TICKS,
            extra_ambience_controllers: Vec::new(),
        }
    }
}

impl Config {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse the `key = value` configuration format.
    ///
    /// Unknown keys are rejected rather than ignored, so a typo in a
    /// config file fails loudly instead of silently using a default.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Config::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| SyncError::Config {
                option: line.to_string(),
                reason: "expected `key = value`".to_string(),
            })?;
            config.set(key.trim(), value.trim())?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON rendition of the configuration, for embedders that
    /// marshal options themselves.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "import_source_file_path" => {
                self.import_source_file_path = Some(PathBuf::from(value));
            }
            "track_name_prefix" => {
                self.track_name_prefix = Some(value.to_string());
            }
            "excluded_item_name_patterns" => {
                self.excluded_item_name_patterns = split_list(value);
            }
            "default_velocity" => {
                let velocity = parse_int(key, value)?;
                if velocity > 127 {
                    return Err(SyncError::Config {
                        option: key.to_string(),
                        reason: format!("{velocity} out of range 0-127"),
                    });
                }
                self.default_velocity = velocity as u8;
            }
            "quantize_grid_ticks" => {
                self.quantize_grid_ticks = parse_int(key, value)?;
            }
            "duration_grid_ticks" => {
                self.duration_grid_ticks = Some(parse_int(key, value)?);
            }
            "structure_track_name" => {
                self.structure_track_name = value.to_string();
            }
            "structure_tail_ticks" => {
                self.structure_tail_ticks = parse_int(key, value)?;
            }
            "extra_ambience_controllers" => {
                let mut ccs = Vec::new();
                for part in split_list(value) {
                    let cc = parse_int(key, &part)?;
                    if cc > 127 {
                        return Err(SyncError::Config {
                            option: key.to_string(),
                            reason: format!("CC number {cc} out of range 0-127"),
                        });
                    }
                    ccs.push(cc as u8);
                }
                self.extra_ambience_controllers = ccs;
            }
            unknown => {
                return Err(SyncError::Config {
                    option: unknown.to_string(),
                    reason: "unrecognized option".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check option ranges; called by both parsers.
    pub fn validate(&self) -> Result<()> {
        if self.default_velocity > 127 {
            return Err(SyncError::Config {
                option: "default_velocity".to_string(),
                reason: format!("{} out of range 0-127", self.default_velocity),
            });
        }
        if self.quantize_grid_ticks == 0 {
            return Err(SyncError::Config {
                option: "quantize_grid_ticks".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.duration_grid_ticks == Some(0) {
            return Err(SyncError::Config {
                option: "duration_grid_ticks".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.structure_tail_ticks == 0 {
            return Err(SyncError::Config {
                option: "structure_tail_ticks".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.structure_track_name.is_empty() {
            return Err(SyncError::Config {
                option: "structure_track_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The configured source file path, required for import.
    pub fn source_path(&self) -> Result<&Path> {
        self.import_source_file_path
            .as_deref()
            .ok_or_else(|| SyncError::Config {
                option: "import_source_file_path".to_string(),
                reason: "required for import but not set".to_string(),
            })
    }

    /// The configured track-name prefix, required for import and
    /// normalization.
    pub fn prefix(&self) -> Result<&str> {
        self.track_name_prefix
            .as_deref()
            .ok_or_else(|| SyncError::Config {
                option: "track_name_prefix".to_string(),
                reason: "required but not set".to_string(),
            })
    }

    /// Build the prefix match spec for this configuration.
    pub fn match_spec(&self) -> Result<MatchSpec> {
        Ok(MatchSpec::Prefix(self.prefix()?.to_string()))
    }

    /// Build the import exclusion rules from the configured pattern list.
    pub fn exclusion_rules(&self) -> Vec<ExclusionRule> {
        if self.excluded_item_name_patterns.is_empty() {
            Vec::new()
        } else {
            vec![ExclusionRule::NameMatches(
                self.excluded_item_name_patterns.clone(),
            )]
        }
    }

    /// Build the normalizer options from this configuration.
    pub fn normalize_options(&self) -> Result<NormalizeOptions> {
        let mut options = NormalizeOptions::new(
            self.prefix()?,
            self.default_velocity,
            self.quantize_grid_ticks,
        );
        if let Some(grid) = self.duration_grid_ticks {
            options.duration_grid_ticks = grid;
        }
        options.extra_ambience = self.extra_ambience_controllers.clone();
        Ok(options)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_int(key: &str, value: &str) -> Result<u64> {
    value.parse::<u64>().map_err(|_| SyncError::Config {
        option: key.to_string(),
        reason: format!("`{value}` is not a non-negative integer"),
    })
}
