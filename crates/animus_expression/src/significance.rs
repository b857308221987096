//! Cycle significance: the trivial < moderate < significant < critical tier
//! that gates invocation.

use animus_core::{Event, Significance};

/// A cycle is as significant as its most significant event; an empty cycle
/// is trivial.
pub fn classify(events: &[Event]) -> Significance {
    events
        .iter()
        .map(Event::significance)
        .max()
        .unwrap_or(Significance::Trivial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use animus_core::EventKind;
    use chrono::DateTime;

    fn event(kind: EventKind) -> Event {
        Event::new(kind, "", DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    }

    #[test]
    fn test_empty_is_trivial() {
        assert_eq!(classify(&[]), Significance::Trivial);
    }

    #[test]
    fn test_max_over_events() {
        let events = vec![event(EventKind::Work), event(EventKind::Conflict), event(EventKind::Interaction)];
        assert_eq!(classify(&events), Significance::Significant);
    }

    #[test]
    fn test_payload_override() {
        let events = vec![event(EventKind::Work).with_payload("significance", "critical")];
        assert_eq!(classify(&events), Significance::Critical);

        let events = vec![event(EventKind::Betrayal).with_payload("significance", "trivial")];
        assert_eq!(classify(&events), Significance::Trivial);
    }
}
