//! Check a forward proxy by probing two URLs through it: the monitored
//! primary and a secondary that tells proxy trouble apart from a dead
//! upstream.

use std::time::Duration;

use clap::Parser;

use opscheck::cli;
use opscheck::proxy::ProxyCheck;
use opscheck::severity::Severity;

#[derive(Debug, Parser)]
#[command(
    name = "check-proxy-endpoints",
    about = "Check a forward proxy via a primary and a secondary URL",
    version
)]
struct Args {
    /// Primary URL: the monitored path through the proxy
    #[arg(long)]
    primary: String,

    /// Secondary URL used to distinguish proxy failure from upstream failure
    #[arg(long)]
    secondary: String,

    /// User-Agent header to send
    #[arg(short = 'x', long, default_value = "opscheck-http-check")]
    user_agent: String,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Include the whole response body in the output
    #[arg(short = 'w', long)]
    whole_response: bool,

    /// Per-request timeout in seconds
    #[arg(short = 't', long, default_value_t = 15)]
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
    let check = match ProxyCheck::new(
        Duration::from_secs(args.timeout),
        &args.user_agent,
        args.insecure,
        args.whole_response,
    ) {
        Ok(check) => check,
        Err(err) => return (Severity::Unknown, err.to_string()),
    };
    check.run(&args.primary, &args.secondary).await
}
