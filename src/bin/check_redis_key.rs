//! Check that a redis key holds its expected value.

use std::time::Duration;

use clap::Parser;

use opscheck::cli;
use opscheck::rediskey::{verdict, RedisKeyCheck};
use opscheck::severity::Severity;

#[derive(Debug, Parser)]
#[command(
    name = "check-redis-key",
    about = "Check the value of a redis key against an expected value",
    version
)]
struct Args {
    /// Redis host to connect to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Redis port to connect to
    #[arg(short = 'p', long, default_value_t = 6379)]
    port: u16,

    /// Redis database number to connect to
    #[arg(short = 'n', long = "dbnumber", default_value_t = 0)]
    database: i64,

    /// Redis password to connect with
    #[arg(short = 'P', long)]
    password: Option<String>,

    /// Key to monitor
    #[arg(short = 'K', long)]
    key: String,

    /// Expected value of the key
    #[arg(long = "expected", default_value = "0")]
    expected: String,

    /// Timeout in seconds to complete the operation
    #[arg(short = 't', long, default_value_t = 10)]
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
    let check = RedisKeyCheck {
        host: args.host.clone(),
        port: args.port,
        database: args.database,
        password: args.password.clone(),
    };

    match tokio::time::timeout(Duration::from_secs(args.timeout), check.fetch(&args.key)).await {
        Ok(Ok(value)) => verdict(&args.key, value.as_deref(), &args.expected),
        Ok(Err(err)) => (Severity::Unknown, err.to_string()),
        Err(_) => (
            Severity::Unknown,
            format!(
                "{}:{} timed out after {}s",
                args.host, args.port, args.timeout
            ),
        ),
    }
}
