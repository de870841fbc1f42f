use tracing_subscriber::{fmt, EnvFilter};

pub mod commands;
pub mod config;

/// Logs go to stderr; stdout carries command output.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr).with_ansi(false);
    let _ = if json { builder.json().try_init() } else { builder.try_init() };
}
