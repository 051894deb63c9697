//! Tracing setup for the binary.
//!
//! `CONJUGATOR_LOG` holds an `EnvFilter` directive (default `warn,quiz=info,content=info`).
//! `CONJUGATOR_LOG_FORMAT=json` switches to structured JSON lines.
//! Logs go to stderr so they never interleave with the quiz on stdout.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("CONJUGATOR_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn,quiz=info,content=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match std::env::var("CONJUGATOR_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
