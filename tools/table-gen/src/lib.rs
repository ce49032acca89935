//! Lookup table generators for the FPGA build
//!
//! Two independent generators:
//! - [`song`]: packs melodies into a `.coe` memory initialization file
//! - [`hann`]: emits a SystemVerilog Hann window lookup module

pub mod config;
pub mod error;
pub mod hann;
pub mod output;
pub mod song;

use anyhow::{Context, Result};
use std::path::Path;

pub use config::{load_config, HannConfig, SongConfig, TablesConfig};
pub use error::TableError;
pub use hann::{generate_hann_table, HannParams};
pub use output::{check_artifact, write_artifact, ArtifactStatus};
pub use song::{generate_song_table, Melody, SongLayout};

/// Generate the song memory image and write it to `output` (or the configured path)
pub fn build_song_table(config: &SongConfig, output: Option<&Path>) -> Result<()> {
    let path = output.unwrap_or(config.output.as_path());

    let table = generate_song_table(&config.songs, &config.layout())
        .context("Failed to generate song table")?;
    write_artifact(path, &table)?;

    tracing::info!(
        "Generated song table: {} ({} songs)",
        path.display(),
        config.songs.len()
    );
    Ok(())
}

/// Generate the Hann lookup module and write it to `output` (or the configured path)
pub fn build_hann_table(config: &HannConfig, output: Option<&Path>) -> Result<()> {
    let path = output.unwrap_or(config.output.as_path());
    let params = config.params();

    let table = generate_hann_table(&params).context("Failed to generate Hann table")?;
    write_artifact(path, &table)?;

    tracing::info!(
        "Generated Hann table: {} ({} entries)",
        path.display(),
        params.domain_max() + 1
    );
    Ok(())
}

fn report(name: &str, path: &Path, status: ArtifactStatus) -> bool {
    match status {
        ArtifactStatus::InSync => {
            tracing::info!("{} in sync: {}", name, path.display());
            true
        }
        ArtifactStatus::OutOfSync => {
            tracing::warn!("{} out of sync: {}", name, path.display());
            false
        }
        ArtifactStatus::Missing => {
            tracing::warn!("{} missing: {}", name, path.display());
            false
        }
    }
}

/// Regenerate both tables in memory and compare them with the files on disk.
///
/// Returns `true` when every artifact matches.
pub fn check_tables(config: &TablesConfig) -> Result<bool> {
    let song_table = generate_song_table(&config.song.songs, &config.song.layout())
        .context("Failed to generate song table")?;
    let song_status = check_artifact(&config.song.output, &song_table)?;

    let hann_table =
        generate_hann_table(&config.hann.params()).context("Failed to generate Hann table")?;
    let hann_status = check_artifact(&config.hann.output, &hann_table)?;

    let song_ok = report("Song table", &config.song.output, song_status);
    let hann_ok = report("Hann table", &config.hann.output, hann_status);
    Ok(song_ok && hann_ok)
}
