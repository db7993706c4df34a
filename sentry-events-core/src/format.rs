//! Output shaping of fetched events

use crate::event::{Event, ExtendedEvent, FormattedEvent};
use crate::tags::reshape_tags;

/// `dateCreated` and `tags` always. `dateReceived` and `context` only when
/// the event carried both of them.
pub fn format_event(event: &Event) -> FormattedEvent {
    let base = event.base();
    let (date_received, context) = match event {
        Event::Extended(ExtendedEvent {
            date_received: Some(date_received),
            context: Some(context),
            ..
        }) => (Some(date_received.clone()), Some(context.clone())),
        _ => (None, None),
    };

    FormattedEvent {
        date_created: base.date_created.clone(),
        tags: reshape_tags(&base.tags),
        date_received,
        context,
    }
}

pub fn format_events(events: &[Event]) -> Vec<FormattedEvent> {
    events.iter().map(format_event).collect()
}
