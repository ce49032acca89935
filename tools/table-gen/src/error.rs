//! Errors raised while building or writing lookup tables

use std::path::PathBuf;

/// Failure while generating or writing a table artifact
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Melody leaves no room for its terminator plus at least one padding entry
    #[error(
        "song {index} has {len} notes but a {slot_len}-entry slot holds at most {max} \
         (terminator and at least one padding entry must fit)"
    )]
    MelodyTooLong {
        index: usize,
        len: usize,
        slot_len: usize,
        max: usize,
    },

    /// Note value outside the 7-bit pitch range
    #[error("song {index} note {position} is {value} (notes must be 0-{max})")]
    NoteOutOfRange {
        index: usize,
        position: usize,
        value: u8,
        max: u8,
    },

    /// Slot layout cannot hold a terminator and padding
    #[error("invalid song layout: {0}")]
    InvalidLayout(String),

    /// Window domain collapses to a single point (N == 0)
    #[error("window domain is empty: n_bits = {n_bits} gives N = 0")]
    DomainComputation { n_bits: u32 },

    /// Bit width outside what the generator can represent
    #[error("{name} = {bits} is out of range (must be {min}-{max})")]
    WidthOutOfRange {
        name: &'static str,
        bits: u32,
        min: u32,
        max: u32,
    },

    /// Generated module name is not a legal identifier
    #[error("invalid module name {0:?}")]
    InvalidModuleName(String),

    /// Sample index outside [0, N]
    #[error("sample index {n} outside window domain [0, {max}]")]
    IndexOutOfDomain { n: u64, max: u64 },

    /// Destination could not be written
    #[error("failed to write {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting into the in-memory artifact failed
    #[error("failed to format table text")]
    Format(#[from] std::fmt::Error),

    /// Existing artifact could not be read back
    #[error("failed to read {}", path.display())]
    OutputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_song() {
        let err = TableError::MelodyTooLong {
            index: 2,
            len: 249,
            slot_len: 250,
            max: 248,
        };
        let msg = err.to_string();
        assert!(msg.contains("song 2"));
        assert!(msg.contains("249 notes"));
        assert!(msg.contains("at most 248"));
    }

    #[test]
    fn write_error_keeps_io_source() {
        use std::error::Error;

        let err = TableError::OutputWrite {
            path: PathBuf::from("out/hann.sv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("out/hann.sv"));
        assert!(err.source().is_some());
    }
}
