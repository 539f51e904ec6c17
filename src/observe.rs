//! Terminal logging for optional construction diagnostics.
//!
//! Compiled only with the `obs_slog` feature. Records go to stderr through
//! an asynchronous drain so numerical code never blocks on terminal I/O.
use slog::{Drain, Logger, o};

/// Root logger writing full-format records to stderr.
pub fn terminal_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!("crate" => "rust_bijectors"))
}
