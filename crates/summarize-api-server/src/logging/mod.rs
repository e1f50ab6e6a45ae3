//! Tracing subscriber setup (JSON to stdout, optionally to a daily-rolling file)

mod logger;

pub use logger::init_tracing;
