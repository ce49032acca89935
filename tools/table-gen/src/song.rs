//! Song memory image encoder
//!
//! Packs melodies into fixed-size slots of a radix-2 memory initialization
//! file (`.coe`). Each slot holds the melody's notes, one terminator code and
//! padding up to the slot length. One extra empty slot is always appended for
//! a custom song loaded at runtime by the hardware.

use serde::Deserialize;
use std::fmt::Write as FmtWrite;

use crate::error::TableError;

/// Number of entries reserved for each song
pub const SLOT_LEN: usize = 250;

/// Code written after a song's last note
pub const END_SONG: u8 = 0b111_1100;

/// Filler written after the terminator
pub const PADDING: u8 = 127;

/// Rest note in melody data ("hold / no change")
///
/// Shares its value with [`PADDING`] but the two are unrelated.
pub const REST_NOTE: u8 = 127;

/// Highest note value a melody may contain
pub const MAX_NOTE: u8 = 127;

/// Largest slot a layout may request
pub const MAX_SLOT_LEN: usize = 1 << 16;

/// Ordered sequence of 7-bit note codes
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct Melody(Vec<u8>);

impl Melody {
    pub fn new(notes: Vec<u8>) -> Self {
        Self(notes)
    }

    pub fn notes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Melody {
    fn from(notes: &[u8]) -> Self {
        Self(notes.to_vec())
    }
}

/// Slot geometry and reserved codes of the song memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongLayout {
    pub slot_len: usize,
    pub terminator: u8,
    pub padding: u8,
}

impl Default for SongLayout {
    fn default() -> Self {
        Self {
            slot_len: SLOT_LEN,
            terminator: END_SONG,
            padding: PADDING,
        }
    }
}

impl SongLayout {
    /// Longest melody that still leaves room for a terminator and one padding entry
    pub fn max_notes(&self) -> usize {
        self.slot_len.saturating_sub(2)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.slot_len < 2 {
            return Err(TableError::InvalidLayout(format!(
                "slot_len = {} cannot hold a terminator and padding",
                self.slot_len
            )));
        }
        if self.slot_len > MAX_SLOT_LEN {
            return Err(TableError::InvalidLayout(format!(
                "slot_len = {} exceeds {}",
                self.slot_len, MAX_SLOT_LEN
            )));
        }
        for (name, code) in [("terminator", self.terminator), ("padding", self.padding)] {
            if code > MAX_NOTE {
                return Err(TableError::InvalidLayout(format!(
                    "{} = {} is not a 7-bit code",
                    name, code
                )));
            }
        }
        Ok(())
    }
}

/// Encode one melody into a full slot: notes, terminator, padding.
///
/// `index` only labels errors and log lines.
pub fn encode_slot(
    index: usize,
    melody: &Melody,
    layout: &SongLayout,
) -> Result<Vec<u8>, TableError> {
    layout.validate()?;

    if melody.len() > layout.max_notes() {
        return Err(TableError::MelodyTooLong {
            index,
            len: melody.len(),
            slot_len: layout.slot_len,
            max: layout.max_notes(),
        });
    }

    for (position, &value) in melody.notes().iter().enumerate() {
        if value > MAX_NOTE {
            return Err(TableError::NoteOutOfRange {
                index,
                position,
                value,
                max: MAX_NOTE,
            });
        }
        if value == layout.terminator {
            tracing::warn!(
                "song {} note {} equals the terminator code {:#09b}; playback will stop there",
                index,
                position,
                value
            );
        }
    }

    let mut slot = Vec::with_capacity(layout.slot_len);
    slot.extend_from_slice(melody.notes());
    slot.push(layout.terminator);
    slot.resize(layout.slot_len, layout.padding);

    tracing::debug!(
        "song {}: {} notes, {} padding entries",
        index,
        melody.len(),
        layout.slot_len - melody.len() - 1
    );

    Ok(slot)
}

/// Trailing slot left empty for a song supplied later by the hardware
pub fn custom_slot(layout: &SongLayout) -> Vec<u8> {
    let mut slot = vec![layout.padding; layout.slot_len.saturating_sub(1)];
    slot.push(layout.terminator);
    slot
}

/// Every entry of the memory image in address order
pub fn song_table_entries(
    melodies: &[Melody],
    layout: &SongLayout,
) -> Result<Vec<u8>, TableError> {
    layout.validate()?;

    let total = (melodies.len() + 1)
        .checked_mul(layout.slot_len)
        .ok_or_else(|| {
            TableError::InvalidLayout(format!(
                "{} slots of {} entries overflow the address space",
                melodies.len() + 1,
                layout.slot_len
            ))
        })?;

    let mut entries = Vec::with_capacity(total);
    for (index, melody) in melodies.iter().enumerate() {
        entries.extend(encode_slot(index, melody, layout)?);
    }
    entries.extend(custom_slot(layout));

    Ok(entries)
}

/// Render the complete `.coe` memory initialization file.
///
/// All entries end in `,` except the last, which ends the vector with `;`
/// and is not followed by a newline.
pub fn generate_song_table(
    melodies: &[Melody],
    layout: &SongLayout,
) -> Result<String, TableError> {
    let entries = song_table_entries(melodies, layout)?;

    tracing::debug!(
        "{} songs + custom slot = {} entries",
        melodies.len(),
        entries.len()
    );

    // 8 digits + separator + newline per entry
    let mut output = String::with_capacity(entries.len().saturating_mul(10).saturating_add(64));
    writeln!(output, "memory_initialization_radix=2;")?;
    writeln!(output, "memory_initialization_vector=")?;

    if let Some((last, body)) = entries.split_last() {
        for entry in body {
            writeln!(output, "{:08b},", entry)?;
        }
        write!(output, "{:08b};", last)?;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(table: &str) -> Vec<&str> {
        table.lines().skip(2).collect()
    }

    #[test]
    fn test_short_melody_slot() {
        let melody = Melody::new(vec![127, 127, 76, 74]);
        let slot = encode_slot(0, &melody, &SongLayout::default()).unwrap();

        assert_eq!(slot.len(), SLOT_LEN);
        assert_eq!(&slot[..4], &[127, 127, 76, 74]);
        assert_eq!(slot[4], END_SONG);
        assert!(slot[5..].iter().all(|&e| e == PADDING));
        assert_eq!(slot[5..].len(), 245);
    }

    #[test]
    fn test_longest_melody_fits() {
        let melody = Melody::new(vec![60; 248]);
        let slot = encode_slot(0, &melody, &SongLayout::default()).unwrap();

        assert_eq!(slot.len(), SLOT_LEN);
        assert_eq!(slot[248], END_SONG);
        assert_eq!(slot[249], PADDING);
    }

    #[test]
    fn test_melody_without_room_for_padding() {
        for len in [249, 250, 400] {
            let melody = Melody::new(vec![60; len]);
            let err = encode_slot(3, &melody, &SongLayout::default()).unwrap_err();
            match err {
                TableError::MelodyTooLong {
                    index,
                    len: got,
                    slot_len,
                    max,
                } => {
                    assert_eq!(index, 3);
                    assert_eq!(got, len);
                    assert_eq!(slot_len, 250);
                    assert_eq!(max, 248);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_note_out_of_range() {
        let melody = Melody::new(vec![72, 128, 74]);
        let err = encode_slot(1, &melody, &SongLayout::default()).unwrap_err();
        assert!(matches!(
            err,
            TableError::NoteOutOfRange {
                index: 1,
                position: 1,
                value: 128,
                ..
            }
        ));
    }

    #[test]
    fn test_rest_and_padding_are_independent() {
        let layout = SongLayout {
            padding: 0,
            ..SongLayout::default()
        };
        let slot = encode_slot(0, &Melody::new(vec![REST_NOTE, 72]), &layout).unwrap();
        assert_eq!(slot[0], REST_NOTE);
        assert_eq!(slot[2], END_SONG);
        assert_eq!(slot[3], 0);
    }

    #[test]
    fn test_custom_slot() {
        let slot = custom_slot(&SongLayout::default());
        assert_eq!(slot.len(), SLOT_LEN);
        assert!(slot[..249].iter().all(|&e| e == PADDING));
        assert_eq!(slot[249], END_SONG);
    }

    #[test]
    fn test_invalid_layout() {
        let layout = SongLayout {
            slot_len: 1,
            ..SongLayout::default()
        };
        assert!(matches!(
            song_table_entries(&[], &layout),
            Err(TableError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_oversized_slot_rejected() {
        for slot_len in [MAX_SLOT_LEN + 1, usize::MAX] {
            let layout = SongLayout {
                slot_len,
                ..SongLayout::default()
            };
            assert!(matches!(
                song_table_entries(&[Melody::new(vec![1])], &layout),
                Err(TableError::InvalidLayout(_))
            ));
        }

        let layout = SongLayout {
            slot_len: MAX_SLOT_LEN,
            ..SongLayout::default()
        };
        let entries = song_table_entries(&[Melody::new(vec![1])], &layout).unwrap();
        assert_eq!(entries.len(), 2 * MAX_SLOT_LEN);
    }

    #[test]
    fn test_reserved_codes_must_be_seven_bit() {
        for layout in [
            SongLayout {
                terminator: 128,
                ..SongLayout::default()
            },
            SongLayout {
                padding: 255,
                ..SongLayout::default()
            },
        ] {
            assert!(matches!(
                generate_song_table(&[], &layout),
                Err(TableError::InvalidLayout(_))
            ));
        }
    }

    #[test]
    fn test_table_entry_count() {
        let melodies = vec![
            Melody::new(vec![76, 74, 72]),
            Melody::new(vec![]),
            Melody::new(vec![127; 100]),
        ];
        let table = generate_song_table(&melodies, &SongLayout::default()).unwrap();
        let lines = lines_of(&table);

        assert_eq!(lines.len(), 250 * 4);
        assert!(lines[..lines.len() - 1].iter().all(|l| l.ends_with(',')));
        assert_eq!(*lines.last().unwrap(), "01111100;");
    }

    #[test]
    fn test_table_header_and_literals() {
        let table =
            generate_song_table(&[Melody::new(vec![5, 76])], &SongLayout::default()).unwrap();
        let mut lines = table.lines();

        assert_eq!(lines.next(), Some("memory_initialization_radix=2;"));
        assert_eq!(lines.next(), Some("memory_initialization_vector="));
        assert_eq!(lines.next(), Some("00000101,"));
        assert_eq!(lines.next(), Some("01001100,"));
        assert_eq!(lines.next(), Some("01111100,"));
        assert_eq!(lines.next(), Some("01111111,"));
        assert!(!table.ends_with('\n'));
    }

    #[test]
    fn test_empty_song_list_has_custom_slot_only() {
        let table = generate_song_table(&[], &SongLayout::default()).unwrap();
        let lines = lines_of(&table);
        assert_eq!(lines.len(), 250);
        assert_eq!(lines[0], "01111111,");
        assert_eq!(lines[249], "01111100;");
    }

    #[test]
    fn test_failure_aborts_whole_table() {
        let melodies = vec![Melody::new(vec![72]), Melody::new(vec![72; 249])];
        let err = generate_song_table(&melodies, &SongLayout::default()).unwrap_err();
        assert!(matches!(err, TableError::MelodyTooLong { index: 1, .. }));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let melodies = vec![Melody::new(vec![76, 127, 74])];
        let a = generate_song_table(&melodies, &SongLayout::default()).unwrap();
        let b = generate_song_table(&melodies, &SongLayout::default()).unwrap();
        assert_eq!(a, b);
    }
}
