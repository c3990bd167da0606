//! Span and event macros for the inspection pipeline.
//!
//! With the `tracing` feature each macro forwards to `tracing`; without it
//! they expand to nothing, and `NoopSpan` stands in for the span guard.
//!
//! Levels: a whole refresh or shift search is an `info` span, each stage
//! inside it (FFT correlation, threshold, morphology, contour tracing) is a
//! `debug` span, and stage results (match location, crop, counts) are `info`
//! events.

/// `info` span around a whole operation.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// `debug` span around one pipeline stage.
#[cfg(feature = "tracing")]
macro_rules! stage_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::debug_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! stage_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// `info` event carrying the result of a stage as `key = value` fields.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use stage_span;
pub(crate) use trace_event;
pub(crate) use trace_span;

/// Guard returned by the span macros when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Same shape as `Span::entered`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
