//! Sentry REST API client
//!
//! Two endpoints are used: the paginated issue event listing and the
//! per-project event detail. Every request carries the bearer token.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, info};
use url::Url;

use crate::constants::{self, CURSOR_PARAM};
use crate::context::Context;
use crate::error::{Result, SentryEventsError};
use crate::event::{ExtendedEvent, IssueEvent};
use crate::link;

#[derive(Clone)]
pub struct SentryClient {
    http: reqwest::Client,
    api_base: Url,
    concurrency: usize,
}

impl SentryClient {
    pub fn new(ctx: &Context) -> Result<Self> {
        let token = ctx.require_token()?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(constants::USER_AGENT));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = ctx.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(SentryClient {
            http: builder.build()?,
            api_base: ctx.api_base.clone(),
            concurrency: ctx.concurrency.max(1),
        })
    }

    /// Lists the events of an issue across at most `pages` pages.
    ///
    /// The first page is always requested. Each further page needs both a
    /// `rel="next"` cursor in the previous answer and remaining budget, so
    /// `pages` = N issues at most N requests (0 behaves like 1).
    pub async fn list_issue_events(&self, issue_id: &str, pages: u32) -> Result<Vec<IssueEvent>> {
        let url = self.endpoint(&["issues", issue_id, "events"])?;
        let mut remaining = pages.saturating_sub(1);
        let mut cursor: Option<String> = None;
        let mut page = 1;
        let mut events = Vec::new();

        loop {
            let response = self.get(&url, cursor.as_deref()).await?;
            let next = link::next_cursor(
                response
                    .headers()
                    .get(LINK)
                    .and_then(|value| value.to_str().ok()),
            );
            let chunk: Vec<IssueEvent> = decode(response, &url).await?;
            info!("Issue {} page {}: {} events", issue_id, page, chunk.len());
            events.extend(chunk);

            match next {
                Some(next) if remaining > 0 => {
                    remaining -= 1;
                    page += 1;
                    cursor = Some(next);
                }
                Some(_) => {
                    debug!("Page budget exhausted, more events are available for issue {}", issue_id);
                    break;
                }
                None => break,
            }
        }

        Ok(events)
    }

    pub async fn get_extended_event(
        &self,
        organisation: &str,
        project_name: &str,
        event_id: &str,
    ) -> Result<ExtendedEvent> {
        if organisation.is_empty() || project_name.is_empty() {
            return Err(SentryEventsError::Validation(
                "organisation and project name are required to fetch an extended event".to_string(),
            ));
        }

        let url = self.endpoint(&["projects", organisation, project_name, "events", event_id])?;
        let response = self.get(&url, None).await?;
        decode(response, &url).await
    }

    /// Fetches the extended form of every event, at most `concurrency`
    /// requests in flight. Output order follows input order; the first
    /// failure aborts the outstanding requests.
    pub async fn get_extended_events(
        &self,
        organisation: &str,
        project_name: &str,
        events: &[IssueEvent],
    ) -> Result<Vec<ExtendedEvent>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(events.len());

        for event in events {
            let semaphore = Arc::clone(&semaphore);
            let client = self.clone();
            let organisation = organisation.to_string();
            let project_name = project_name.to_string();
            let event_id = event.event_id.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                client
                    .get_extended_event(&organisation, &project_name, &event_id)
                    .await
            }));
        }

        let mut extended = Vec::with_capacity(handles.len());
        let mut pending = handles.into_iter();
        while let Some(handle) = pending.next() {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(err) => Err(err.into()),
            };
            match outcome {
                Ok(event) => extended.push(event),
                Err(err) => {
                    for handle in pending.by_ref() {
                        handle.abort();
                    }
                    return Err(err);
                }
            }
        }

        Ok(extended)
    }

    /// API URL for the given path segments, always ending in `/`
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SentryEventsError::Config(format!("API base cannot take a path: {}", self.api_base))
            })?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    async fn get(&self, url: &Url, cursor: Option<&str>) -> Result<reqwest::Response> {
        debug!("GET {} cursor={:?}", url, cursor);

        let mut request = self.http.get(url.clone());
        if let Some(cursor) = cursor {
            request = request.query(&[(CURSOR_PARAM, cursor)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentryEventsError::api(status, url.as_str(), &body));
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response, url: &Url) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| {
        debug!("Malformed body from {}: {}", url, err);
        SentryEventsError::Json(err)
    })
}
