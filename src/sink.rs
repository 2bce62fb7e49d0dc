//! Injected logging capability.
//!
//! The original tooling around this format wrote progress lines to a global
//! console object. Here the parser takes a [`LogSink`] by reference instead:
//! [`FacadeSink`] forwards to the [`log`] crate for normal use, and
//! [`NopSink`] discards everything (the default in tests).

use std::fmt;

/// Leveled message sink consumed by the parsing entry points.
///
/// Messages are informational only; they are an observable side effect, not
/// part of the data contract.
pub trait LogSink {
    /// Informational message (per-section record counts and the like).
    fn info(&self, args: fmt::Arguments<'_>);
    /// Warning (a required chunk was missing, the document is invalid).
    fn warn(&self, args: fmt::Arguments<'_>);
}

/// Sink that discards all messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopSink;

impl LogSink for NopSink {
    fn info(&self, _args: fmt::Arguments<'_>) {}
    fn warn(&self, _args: fmt::Arguments<'_>) {}
}

/// Sink that forwards to the [`log`] crate macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn info(&self, args: fmt::Arguments<'_>) {
        log::info!("{args}");
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        log::warn!("{args}");
    }
}
