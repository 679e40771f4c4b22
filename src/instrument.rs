//! Feature-gated tracing and metrics hooks.
//!
//! Each macro expands to an empty block when its feature is disabled, so it
//! can be used in statement or expression position.

macro_rules! debug_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    }};
}

macro_rules! warn_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::warn!($($arg)*);
    }};
}

macro_rules! count {
    ($name:literal) => {{
        #[cfg(feature = "metrics")]
        {
            metrics::counter!($name).increment(1);
        }
    }};
}

pub(crate) use count;
pub(crate) use debug_event;
pub(crate) use warn_event;
