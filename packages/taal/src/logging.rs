//! Global logging system.

use std::{
    env,
    panic,
};
use backtrace::Backtrace;
use tracing_subscriber::{
    fmt::{
        self,
        time::uptime,
    },
    prelude::*,
    Registry,
    EnvFilter,
};


/// Default logging environment filter. Our crates are debug, everything else is warn.
const DEFAULT_FILTER: &'static str = "warn,graphics=debug,taal=debug";

/// Initializes a `tracing` logging backend which outputs to stdout. Accepts
/// ecosystem-standard `RUST_LOG` env filters, which are applied on top of
/// the defaults.
pub fn init_logging() {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer()
        .event_format(format);

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter_directives(env::var(EnvFilter::DEFAULT_ENV).ok())))
        .with(stdout_log);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("unable to install log subscriber: {}", e);
        return;
    }
    info!("starting program");

    // make panic messages and backtrace go through logging system
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
            error!("{:?}", Backtrace::new());
        }
    }));
    trace!("installed custom panic hook");
}

/// The default filter, followed by any user-provided directives so that they
/// take precedence.
fn filter_directives(env_filter: Option<String>) -> String {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Some(env_filter) = env_filter.filter(|s| !s.is_empty()) {
        filter.push(',');
        filter.push_str(&env_filter);
    }
    filter
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directives_are_appended() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some(String::new())), DEFAULT_FILTER);
        assert_eq!(
            filter_directives(Some("taal::input=trace".to_owned())),
            "warn,graphics=debug,taal=debug,taal::input=trace",
        );
    }
}
