use clap::Parser;

use crate::severity::Severity;

/// Initialize tracing for a probe binary.
///
/// Log output goes to stderr: stdout must carry exactly the one result line
/// the scheduler parses.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse CLI arguments, exiting UNKNOWN (3) on usage errors.
///
/// Clap's default error exit code is 2, which the scheduler would read as
/// CRITICAL; a bad invocation is a configuration problem, not an outage.
/// `--help` and `--version` still exit 0.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(Severity::Unknown.exit_code());
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(0);
        }
    }
}

/// Emit the single result line and exit with the severity's code.
pub fn finish(severity: Severity, message: &str) -> ! {
    println!("{severity}: {message}");
    std::process::exit(severity.exit_code());
}
