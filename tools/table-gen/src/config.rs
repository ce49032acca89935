//! Table configuration
//!
//! Parses an optional `tables.toml`. Every field has a default, so an empty
//! file (or no file at all) reproduces the built-in tables.
//!
//! ```toml
//! [song]
//! output = "final_songs.coe"
//! songs = [[127, 127, 76, 74], [72, 72, 71]]
//!
//! [hann]
//! output = "hann.sv"
//! n_bits = 12
//! out_bits = 24
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::hann::{self, HannParams};
use crate::song::{self, Melody, SongLayout};

const SONG_0: &[u8] = &[
    127, 127, 127, 127, 76, 76, 74, 74, 72, 72, 74, 74, 76, 127, 76, 127, 76, 76, 127,
    127, 74, 127, 74, 127, 74, 74, 127, 127, 76, 127, 79, 127, 79, 79, 127, 127, 76, 76,
    74, 74, 72, 72, 74, 74, 76, 127, 76, 127, 76, 127, 76, 127, 74, 127, 74, 127, 76,
    76, 74, 74, 72, 72, 127, 127,
];

const SONG_1: &[u8] = &[
    127, 127, 127, 127, 76, 76, 71, 72, 74, 74, 72, 71, 69, 127, 69, 72, 76, 127, 74,
    72, 71, 71, 127, 72, 74, 74, 76, 76, 72, 72, 69, 127, 69, 69, 127, 127, 127, 74, 74,
    77, 81, 81, 79, 77, 76, 76, 127, 72, 76, 76, 74, 72, 71, 71, 71, 72, 74, 74, 76, 76,
    72, 72, 69, 127, 69, 69, 127, 127,
];

const SONG_2: &[u8] = &[
    127, 127, 127, 127, 72, 72, 127, 72, 72, 127, 72, 72, 72, 127, 127, 127, 127, 127,
    72, 71, 71, 69, 71, 71, 72, 74, 74, 74, 76, 76, 127, 76, 76, 127, 76, 76, 76, 127,
    127, 127, 127, 127, 76, 74, 74, 72, 74, 74, 76, 77, 77, 127, 79, 79, 79, 127, 127,
    127, 72, 72, 72, 127, 127, 127, 127, 127, 81, 79, 79, 77, 76, 76, 76, 74, 74, 74,
    72, 72, 72, 127, 127, 127,
];

/// Melodies baked into the song ROM when no config overrides them
pub fn builtin_songs() -> Vec<Melody> {
    [SONG_0, SONG_1, SONG_2]
        .into_iter()
        .map(Melody::from)
        .collect()
}

/// Root config structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    pub song: SongConfig,
    pub hann: HannConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SongConfig {
    pub output: PathBuf,
    pub slot_len: usize,
    pub terminator: u8,
    pub padding: u8,
    pub songs: Vec<Melody>,
}

impl Default for SongConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("final_songs.coe"),
            slot_len: song::SLOT_LEN,
            terminator: song::END_SONG,
            padding: song::PADDING,
            songs: builtin_songs(),
        }
    }
}

impl SongConfig {
    pub fn layout(&self) -> SongLayout {
        SongLayout {
            slot_len: self.slot_len,
            terminator: self.terminator,
            padding: self.padding,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HannConfig {
    pub output: PathBuf,
    pub module: String,
    pub n_bits: u32,
    pub out_bits: u32,
}

impl Default for HannConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("hann.sv"),
            module: hann::DEFAULT_MODULE_NAME.to_string(),
            n_bits: hann::N_BITS,
            out_bits: hann::OUT_BITS,
        }
    }
}

impl HannConfig {
    pub fn params(&self) -> HannParams {
        HannParams {
            n_bits: self.n_bits,
            out_bits: self.out_bits,
            module_name: self.module.clone(),
        }
    }
}

/// Load and parse a config file
pub fn load_config(path: &Path) -> Result<TablesConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    parse_config(&content).with_context(|| format!("Failed to parse config: {:?}", path))
}

pub fn parse_config(content: &str) -> Result<TablesConfig> {
    Ok(toml::from_str(content)?)
}
