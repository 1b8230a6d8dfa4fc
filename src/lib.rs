// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod countdown;
pub mod logging;
pub mod runtime;
pub mod scores;
pub mod scoring;
pub mod sentences;
pub mod session;
pub mod ui;

/// How often the event loop wakes up to poll the countdown and redraw
pub const TICK_RATE_MS: u64 = 100;
