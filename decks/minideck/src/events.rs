//! Key press event decoding.
//!
//! The deck reports key state as 8-byte interrupt input reports: a report
//! id, one pressed flag per key, and a trailing padding byte. Events are
//! edge triggered, so a report only produces events for keys whose flag
//! differs from the stored state.

use std::fmt;

use crate::consts::NUM_KEYS;

/// A key state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckEvent {
    /// Key pressed
    Down(u8),
    /// Key released
    Up(u8),
}

impl fmt::Display for DeckEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckEvent::Down(key) => write!(f, "key {key} down"),
            DeckEvent::Up(key) => write!(f, "key {key} up"),
        }
    }
}

/// Diff an input report against the stored key state, flipping changed
/// entries and returning one event per transition.
///
/// Reports shorter than the fixed layout are ignored.
pub fn decode_report(keys: &mut [bool; NUM_KEYS], report: &[u8]) -> Vec<DeckEvent> {
    if report.len() < NUM_KEYS + 2 {
        return Vec::new();
    }

    let mut events = Vec::new();
    // skip the report id; the padding byte at the end is never read
    for (key, (flag, state)) in report[1..=NUM_KEYS].iter().zip(keys.iter_mut()).enumerate() {
        let pressed = *flag != 0;
        if pressed != *state {
            *state = pressed;
            events.push(if pressed {
                DeckEvent::Down(key as u8)
            } else {
                DeckEvent::Up(key as u8)
            });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_triggered_events() {
        let mut keys = [false; NUM_KEYS];
        let pressed = [0xAA, 1, 0, 0, 0, 0, 0, 0x00];
        assert_eq!(decode_report(&mut keys, &pressed), [DeckEvent::Down(0)]);
        // steady state produces nothing
        assert!(decode_report(&mut keys, &pressed).is_empty());
        let released = [0xAA, 0, 0, 0, 0, 0, 0, 0x00];
        assert_eq!(decode_report(&mut keys, &released), [DeckEvent::Up(0)]);
    }

    #[test]
    fn multiple_transitions_in_one_report() {
        let mut keys = [false; NUM_KEYS];
        keys[2] = true;
        let report = [0x01, 0, 1, 0, 0, 0, 1, 0x00];
        assert_eq!(
            decode_report(&mut keys, &report),
            [DeckEvent::Down(1), DeckEvent::Up(2), DeckEvent::Down(5)]
        );
        assert_eq!(keys, [false, true, false, false, false, true]);
    }

    #[test]
    fn truncated_reports_are_ignored() {
        let mut keys = [false; NUM_KEYS];
        assert!(decode_report(&mut keys, &[0xAA, 1, 1]).is_empty());
        assert_eq!(keys, [false; NUM_KEYS]);
    }
}
