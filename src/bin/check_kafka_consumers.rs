//! Check the status of every consumer group on every cluster monitored by a
//! burrow instance. Any consumer in a non-OK state drives the verdict.

use std::time::Duration;

use clap::Parser;

use opscheck::burrow::{consumer_status_policy, BurrowSource};
use opscheck::cli;
use opscheck::fetch::HttpFetcher;
use opscheck::severity::Severity;
use opscheck::{aggregate, report};

#[derive(Debug, Parser)]
#[command(
    name = "check-kafka-consumers",
    about = "Check consumer group status across all burrow-monitored clusters",
    version
)]
struct Args {
    /// Base burrow URI, e.g. http://burrow.internal:8000
    #[arg(short = 'u', long = "uri")]
    base_uri: String,

    /// Overall evaluation timeout in seconds
    #[arg(short = 't', long, default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() {
    cli::init_tracing();
    let args: Args = cli::parse_args();
    let (severity, message) = run(&args).await;
    cli::finish(severity, &message);
}

async fn run(args: &Args) -> (Severity, String) {
    let timeout = Duration::from_secs(args.timeout);
    let fetcher = match HttpFetcher::new(timeout) {
        Ok(fetcher) => fetcher,
        Err(err) => return (Severity::Unknown, err.to_string()),
    };
    let source = BurrowSource::new(fetcher, &args.base_uri);
    let policy = consumer_status_policy();

    match tokio::time::timeout(timeout, aggregate::evaluate(&source, &policy)).await {
        Ok(Ok(root)) => {
            let report = report::render(&root);
            (report.severity, report.message)
        }
        // Root fetch failure: loss of visibility, not confirmed badness
        Ok(Err(err)) => (Severity::Unknown, err.to_string()),
        Err(_) => (
            Severity::Unknown,
            format!("evaluation timed out after {}s", args.timeout),
        ),
    }
}
