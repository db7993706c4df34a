//! get-sentry-event-data core library
//!
//! Fetches the events of a Sentry issue through the REST API, follows
//! `Link` header pagination, optionally enriches every event with its
//! extended form, and reshapes the result into the JSON the CLI prints.

pub mod client;
pub mod constants;
pub mod context;
pub mod error;
pub mod event;
pub mod format;
pub mod link;
pub mod pipeline;
pub mod tags;

// Re-export commonly used items
pub use client::SentryClient;
pub use context::Context;
pub use error::{Result, SentryEventsError};
pub use event::{Event, ExtendedEvent, FormattedEvent, IssueEvent, Tag, TagMap, TagValue};
pub use pipeline::{get_sentry_event_data, render, Mode, Options, Request};
