use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

/// Installs the global tracing subscriber on stderr. Stdout carries only the
/// rendered panel, so `zbxdash problems --format html > panel.html` never
/// mixes log lines into the page.
///
/// The filter is the first valid candidate among `explicit_filter`,
/// `RUST_LOG` and `warn`.
///
/// # Errors
///
/// Returns an error if no filter candidate parses, if JSON output is requested
/// while the `json-logs` feature is not compiled in, or if a global subscriber
/// is already installed.
pub fn init_tracing(explicit_filter: Option<&str>, use_json: bool) -> Result<()> {
    let mut filter_candidates = Vec::new();
    if let Some(f) = explicit_filter {
        filter_candidates.push(f.to_string());
    }
    if let Ok(env) = std::env::var("RUST_LOG") {
        filter_candidates.push(env);
    }
    filter_candidates.push("warn".to_string());

    let filter = filter_candidates
        .into_iter()
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))?;

    #[cfg(feature = "json-logs")]
    if use_json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        );
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()))?;
        return Ok(());
    }

    #[cfg(not(feature = "json-logs"))]
    if use_json {
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true),
    );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))
}
