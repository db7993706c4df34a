use std::fmt;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_CONCURRENCY, ENV_API_TOKEN, ENV_API_URL, ENV_CONCURRENCY,
    ENV_CTX_OUT, ENV_TIMEOUT, SETUP_URL,
};
use crate::error::{Result, SentryEventsError};

/// Environment context packed in structure
#[derive(Clone)]
pub struct Context {
    // From SENTRY_API_TOKEN, bearer token sent with every request
    pub api_token: String,

    // From SENTRY_API_URL, default https://sentry.io/api/0/
    pub api_base: Url,

    // From SENTRY_EVENTS_CONCURRENCY, in-flight extended event requests, default 5
    pub concurrency: usize,

    // From SENTRY_EVENTS_TIMEOUT (seconds), unset means transport default
    pub timeout: Option<Duration>,

    // From SENTRY_EVENTS_CTXOUT, log resolved context, default false
    pub ctx_out: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            api_token: String::new(),
            api_base: default_api_base(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
            ctx_out: false,
        }
    }
}

// Token is redacted so ctx_out never leaks it into logs
impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.api_token.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("Context")
            .field("api_token", &token)
            .field("api_base", &self.api_base.as_str())
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .field("ctx_out", &self.ctx_out)
            .finish()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load context from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load context from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ctx = Self::default();

        if let Some(token) = lookup(ENV_API_TOKEN) {
            ctx.api_token = token.trim().to_string();
        }

        if let Some(api_url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            ctx.api_base = parse_api_base(&api_url)
                .with_context(|| format!("invalid {} value: {}", ENV_API_URL, api_url))?;
        }

        if let Some(concurrency) = lookup(ENV_CONCURRENCY) {
            ctx.concurrency = concurrency
                .trim()
                .parse::<usize>()
                .unwrap_or(DEFAULT_CONCURRENCY)
                .max(1);
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            let seconds: u64 = timeout
                .trim()
                .parse()
                .with_context(|| format!("invalid {} value: {}", ENV_TIMEOUT, timeout))?;
            ctx.timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        }

        ctx.ctx_out = lookup(ENV_CTX_OUT).is_some();

        Ok(ctx)
    }

    /// Token must be present before any network activity
    pub fn require_token(&self) -> Result<&str> {
        if self.api_token.is_empty() {
            return Err(SentryEventsError::Config(format!(
                "Please specify a {} environment variable. Visit {} for more information",
                ENV_API_TOKEN, SETUP_URL
            )));
        }
        Ok(&self.api_token)
    }
}

fn default_api_base() -> Url {
    Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL")
}

/// Parses the API root, keeping a trailing slash so segments append below it
fn parse_api_base(raw: &str) -> std::result::Result<Url, url::ParseError> {
    let raw = raw.trim();
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{}/", raw))
    }
}
