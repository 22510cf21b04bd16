// Read-only projection of a resource's event history for display.

use crate::models::Event;

/// Most recent events shown on a card.
pub const TIMELINE_CAP: usize = 5;

/// Newest first, at most [`TIMELINE_CAP`] entries. `events` is chronological
/// (oldest first) and is only borrowed, never reordered.
pub fn recent_events(events: &[Event]) -> Vec<&Event> {
    events.iter().rev().take(TIMELINE_CAP).collect()
}

/// Owned copy of [`recent_events`] for serializable views.
pub fn recent_events_owned(events: &[Event]) -> Vec<Event> {
    recent_events(events).into_iter().cloned().collect()
}
