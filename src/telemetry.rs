//! Optional log output for hosts that have no `tracing` subscriber of their own.
//!
//! Generation, lazy extension and rescaling already emit `tracing` events with
//! structured fields; nothing is printed until a subscriber is installed.

/// Installs a compact fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Only available with the `telemetry` feature. Returns `false` without the
/// feature, or when the host already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
