//! Fetch, enrich and format pipeline behind the CLI

use tracing::info;

use crate::client::SentryClient;
use crate::constants::DEFAULT_PAGES;
use crate::error::{Result, SentryEventsError};
use crate::event::{Event, FormattedEvent};
use crate::format::format_events;

/// Raw command line input, before validation
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub event_id: Option<String>,
    pub pages: Option<u32>,
    pub organisation: Option<String>,
    pub project_name: Option<String>,
    pub extended_event: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Basic,
    Extended {
        organisation: String,
        project_name: String,
    },
}

/// Validated run parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub issue_id: String,
    pub pages: u32,
    pub mode: Mode,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Options {
    pub fn validate(self) -> Result<Request> {
        let issue_id = non_empty(self.event_id)
            .ok_or_else(|| SentryEventsError::Validation("You must specify an event ID".to_string()))?;

        let mode = if self.extended_event {
            match (non_empty(self.organisation), non_empty(self.project_name)) {
                (Some(organisation), Some(project_name)) => Mode::Extended {
                    organisation,
                    project_name,
                },
                _ => {
                    return Err(SentryEventsError::Validation(
                        "You must specify an organisation and a project name when using the extended event mode"
                            .to_string(),
                    ))
                }
            }
        } else {
            Mode::Basic
        };

        Ok(Request {
            issue_id,
            pages: self.pages.unwrap_or(DEFAULT_PAGES),
            mode,
        })
    }
}

/// Runs the whole fetch. Either every event is formatted or an error is returned.
pub async fn get_sentry_event_data(
    client: &SentryClient,
    request: &Request,
) -> Result<Vec<FormattedEvent>> {
    let issue_events = client
        .list_issue_events(&request.issue_id, request.pages)
        .await?;
    info!("Fetched {} events for issue {}", issue_events.len(), request.issue_id);

    let events: Vec<Event> = match &request.mode {
        Mode::Basic => issue_events.into_iter().map(Event::Issue).collect(),
        Mode::Extended {
            organisation,
            project_name,
        } => {
            let extended = client
                .get_extended_events(organisation, project_name, &issue_events)
                .await?;
            info!("Fetched {} extended events", extended.len());
            extended.into_iter().map(Event::Extended).collect()
        }
    };

    Ok(format_events(&events))
}

/// Compact JSON document of the formatted events
pub fn render(events: &[FormattedEvent]) -> Result<String> {
    Ok(serde_json::to_string(events)?)
}
