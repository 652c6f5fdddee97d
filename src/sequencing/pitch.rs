/*
Pitch names
===========

  midi      = 12 · (octave + 1) + class (+1 sharp, −1 flat)
  frequency = 440 · 2^((midi − 69) / 12)          A4 = 69 = 440 Hz

  class:  C 0  D 2  E 4  F 5  G 7  A 9  B 11

Accepted spellings: `C4`, `F#3`, `Bb2`, `c#5`, `A-1`, and bare MIDI numbers
such as `60`. Anything else, or a note outside 0..=127, does not resolve and
the caller falls back to `DEFAULT_FREQUENCY`.
*/

use log::debug;

/// C4. Used when an event's pitch cannot be parsed.
pub const DEFAULT_FREQUENCY: f32 = 261.63;

#[inline]
pub fn midi_to_frequency(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

fn pitch_class(letter: char) -> Option<i32> {
    Some(match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    })
}

/// Parse a note name or bare MIDI number into a MIDI note.
pub fn parse_note(text: &str) -> Option<u8> {
    let text = text.trim();
    if let Ok(number) = text.parse::<u8>() {
        return (number <= 127).then_some(number);
    }

    let mut chars = text.chars();
    let class = pitch_class(chars.next()?)?;
    let rest = chars.as_str();
    let symbol = rest.chars().next()?;
    let (accidental, octave) = match symbol {
        '#' | '♯' => (1, &rest[symbol.len_utf8()..]),
        'b' | '♭' => (-1, &rest[symbol.len_utf8()..]),
        _ => (0, rest),
    };
    let octave: i32 = octave.parse().ok()?;

    let midi = 12 * (octave + 1) + class + accidental;
    u8::try_from(midi).ok().filter(|n| *n <= 127)
}

/// Frequency for a pitch name, falling back to [`DEFAULT_FREQUENCY`].
pub fn resolve_frequency(text: &str) -> f32 {
    match parse_note(text) {
        Some(note) => midi_to_frequency(note),
        None => {
            debug!("unresolvable pitch {text:?}, using default frequency");
            DEFAULT_FREQUENCY
        }
    }
}
