use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Tracing to stderr only; stdout belongs to the wire protocol. Level comes
/// from PAUTAD_LOG (or RUST_LOG), defaulting to warn.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("PAUTAD_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("pautad=warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init();
}
