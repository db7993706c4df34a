// Constants used throughout the get-sentry-event-data tool

// Tool identity
pub const TOOL_NAME: &str = "get-sentry-event-data";
pub const TOOL_VERSION: &str = "3.0.0";
pub const USER_AGENT: &str = "get-sentry-event-data/3.0.0";

// Upstream API
pub const DEFAULT_API_BASE: &str = "https://sentry.io/api/0/";
pub const SETUP_URL: &str = "https://github.com/busbud/get-sentry-event-data#setup";

// Environment variables
pub const ENV_API_TOKEN: &str = "SENTRY_API_TOKEN";
pub const ENV_API_URL: &str = "SENTRY_API_URL";
pub const ENV_CONCURRENCY: &str = "SENTRY_EVENTS_CONCURRENCY";
pub const ENV_TIMEOUT: &str = "SENTRY_EVENTS_TIMEOUT";
pub const ENV_CTX_OUT: &str = "SENTRY_EVENTS_CTXOUT";

// Fetching
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_PAGES: u32 = 1;
pub const CURSOR_PARAM: &str = "cursor";

// Link header parsing
pub const REL_NEXT: &str = r#"rel="next""#;
pub const CURSOR_PATTERN: &str = r#"cursor="([a-zA-Z0-9:]*)""#;

// Longest response body excerpt kept in API errors
pub const ERROR_BODY_LIMIT: usize = 512;
