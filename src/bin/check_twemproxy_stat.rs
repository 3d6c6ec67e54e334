//! Check one stat across every pool and backend server reported by a
//! twemproxy stats socket.

use std::time::Duration;

use clap::Parser;

use opscheck::cli;
use opscheck::policy::{Comparison, NumericPolicy, Policy};
use opscheck::severity::Severity;
use opscheck::twemproxy::TwemproxySource;
use opscheck::{aggregate, report};

#[derive(Debug, Parser)]
#[command(
    name = "check-twemproxy-stat",
    about = "Check a per-server stat from a twemproxy stats socket",
    version
)]
struct Args {
    /// Stats host to connect to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Stats port to connect to
    #[arg(short = 'p', long, default_value_t = 22222)]
    port: u16,

    /// Stat key to check under each pool
    #[arg(short = 'k', long = "key")]
    stat_key: String,

    /// Critical threshold
    #[arg(short = 'C', long)]
    critical: f64,

    /// Optional warning threshold
    #[arg(short = 'W', long)]
    warning: Option<f64>,

    /// Comparison direction: a breach is a value less-than or greater-than
    /// the threshold
    #[arg(long, default_value = "less-than", value_parser = Comparison::parse)]
    comparison: Comparison,

    /// Timeout in seconds to complete the operation
    #[arg(short = 't', long, default_value_t = 5)]
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
    let policy = match NumericPolicy::new(args.comparison, Some(args.critical), args.warning) {
        Ok(policy) => Policy::Numeric(policy),
        Err(err) => return (Severity::Unknown, err.to_string()),
    };

    let timeout = Duration::from_secs(args.timeout);
    let source = match TwemproxySource::connect(&args.host, args.port, &args.stat_key, timeout).await
    {
        Ok(source) => source,
        Err(err) => return (Severity::Unknown, err.to_string()),
    };

    // The snapshot is already local; evaluation does no further I/O
    match aggregate::evaluate(&source, &policy).await {
        Ok(root) => {
            let report = report::render(&root);
            (report.severity, report.message)
        }
        Err(err) => (Severity::Unknown, err.to_string()),
    }
}
