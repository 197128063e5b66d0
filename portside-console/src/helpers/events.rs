use portside_common::kubernetes::{Event, EventKind};

/// Number of warning events
pub fn warning_count(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| event.kind == EventKind::Warning)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind) -> Event {
        Event {
            kind,
            reason: String::new(),
            message: String::new(),
            involved_object: String::new(),
            last_timestamp: None,
        }
    }

    #[test]
    fn test_warning_count() {
        let events = vec![
            event(EventKind::Normal),
            event(EventKind::Warning),
            event(EventKind::Unknown),
            event(EventKind::Warning),
        ];
        assert_eq!(warning_count(&events), 2);
        assert_eq!(warning_count(&[]), 0);
    }
}
