use std::io::Write;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sentry_events_core::constants::{TOOL_NAME, TOOL_VERSION};
use sentry_events_core::{get_sentry_event_data, render, Context, Options, Result, SentryClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new(TOOL_NAME)
        .version(TOOL_VERSION)
        .about("Fetch the events of a Sentry issue and print them as JSON")
        .override_usage(format!("{} [options] <event_id>", TOOL_NAME))
        .after_help(
            "Environment:\n  SENTRY_API_TOKEN  Sentry API token (required)\n  SENTRY_API_URL    API root, default https://sentry.io/api/0/",
        )
        .arg(
            Arg::new("event_id")
                .value_name("EVENT_ID")
                .help("Issue ID whose events are fetched"),
        )
        .arg(
            Arg::new("pages")
                .short('p')
                .long("pages")
                .value_name("PAGES")
                .value_parser(value_parser!(u32))
                .default_value("1")
                .help("Number of pages to fetch. Defaults to 1"),
        )
        .arg(
            Arg::new("organisation")
                .short('o')
                .long("organisation")
                .value_name("ORGANISATION")
                .help("Organisation. Required for extended events"),
        )
        .arg(
            Arg::new("project-name")
                .short('n')
                .long("project-name")
                .value_name("PROJECT_NAME")
                .help("Project name. Required for extended events"),
        )
        .arg(
            Arg::new("extended-event")
                .short('x')
                .long("extended-event")
                .action(ArgAction::SetTrue)
                .help("Enable extended event"),
        )
}

fn options_from(matches: &ArgMatches) -> Options {
    Options {
        event_id: matches.get_one::<String>("event_id").cloned(),
        pages: matches.get_one::<u32>("pages").copied(),
        organisation: matches.get_one::<String>("organisation").cloned(),
        project_name: matches.get_one::<String>("project-name").cloned(),
        extended_event: matches.get_flag("extended-event"),
    }
}

async fn run(options: Options) -> Result<()> {
    // Initialize context from environment
    let ctx = Context::from_env()?;

    if ctx.ctx_out {
        eprintln!("Context: {:?}", ctx);
    }

    // Preconditions: nothing touches the network before these pass
    ctx.require_token()?;
    let request = options.validate()?;

    let client = SentryClient::new(&ctx)?;
    let start_time = std::time::Instant::now();

    let events = get_sentry_event_data(&client, &request).await?;
    let output = render(&events)?;

    info!("Fetched {} events in {:?}", events.len(), start_time.elapsed());

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output)?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    // Stdout carries the JSON document, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Err(err) = run(options_from(&matches)).await {
        if err.is_precondition() {
            eprintln!("{}", err);
        } else {
            eprintln!("Error: {}", err);
        }
        std::process::exit(1);
    }
}
