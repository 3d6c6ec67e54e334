//! Check one numeric mbean attribute of a running JVM, read via an external
//! jmxterm jar.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;

use opscheck::cli;
use opscheck::mbean::JmxValueSource;
use opscheck::policy::{Comparison, NumericPolicy};
use opscheck::severity::Severity;

#[derive(Debug, Parser)]
#[command(
    name = "check-mbean",
    about = "Check a numeric mbean attribute against thresholds",
    version
)]
struct Args {
    /// Hostname where the target JVM is running
    #[arg(long)]
    host: String,

    /// JMX port of the target JVM
    #[arg(short = 'p', long)]
    port: u16,

    /// Mbean attribute to read
    #[arg(short = 'b', long = "bean")]
    mbean: String,

    /// Warning threshold
    #[arg(short = 'w', long)]
    warning: Option<f64>,

    /// Critical threshold
    #[arg(short = 'c', long)]
    critical: Option<f64>,

    /// Comparison direction: a breach is a value less-than or greater-than
    /// the threshold
    #[arg(long, default_value = "less-than", value_parser = Comparison::parse)]
    comparison: Comparison,

    /// Path to the jmxterm jar
    #[arg(short = 'j', long = "jmxterm")]
    jmxterm_path: PathBuf,

    /// Timeout in seconds for the jmxterm invocation
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
    // Policy problems are caught before the JVM is ever contacted
    let policy = match NumericPolicy::new(args.comparison, args.critical, args.warning) {
        Ok(policy) => policy,
        Err(err) => return (Severity::Unknown, err.to_string()),
    };

    let source = JmxValueSource {
        host: args.host.clone(),
        port: args.port,
        jar: args.jmxterm_path.clone(),
    };
    let value = match tokio::time::timeout(
        Duration::from_secs(args.timeout),
        source.read(&args.mbean),
    )
    .await
    {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => return (Severity::Unknown, err.to_string()),
        Err(_) => {
            return (
                Severity::Unknown,
                format!("jmxterm timed out after {}s", args.timeout),
            )
        }
    };

    match policy.apply(&Value::from(value)) {
        Ok((severity, detail)) => (severity, format!("{}: {detail}", args.mbean)),
        Err(err) => (Severity::Unknown, err.to_string()),
    }
}
