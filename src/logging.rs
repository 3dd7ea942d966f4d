//! Logging abstraction layer.
//!
//! A single crate-internal macro, `docs_log!`, forwards to either the
//! [`log`](https://docs.rs/log) or [`tracing`](https://docs.rs/tracing)
//! crate depending on which feature is enabled.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! The first argument is the level (`trace`, `debug`, `info`, `warn`,
//! `error`), the rest is `format!`-style:
//!
//! ```ignore
//! docs_log!(error, "embedded URL did not contain '{}'", delimiter);
//! docs_log!(debug, "location unchanged, skipping update");
//! ```
//!
//! With neither backend enabled the arguments are still type-checked so
//! that values computed only for logging do not trigger unused warnings.

macro_rules! docs_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
        #[cfg(not(any(feature = "log", feature = "tracing")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

pub(crate) use docs_log;
