//! devaarg - typed forwarders into C variadic callbacks
//!
//! Calls a `void *(*)(char *, ...)` function with one typed trailing
//! argument, so callers get a uniform, type-checked call shape instead of
//! handling the variadic calling convention per argument type.
//!
//! ```
//! use std::ffi::CStr;
//! use devaarg::{forward_int, probes};
//!
//! let first = CStr::from_bytes_with_nul(b"x\0").unwrap();
//! let handle = unsafe { forward_int(probes::int_identity(), first.as_ptr(), 42) };
//! assert_eq!(handle.addr(), 42);
//! ```

// Core
pub mod forward;
pub mod ffi;

// Loading and driving real libraries
pub mod library;
pub mod setter;
pub mod binding;
pub mod probes;

// Infrastructure
pub mod config;
pub mod errors;
pub mod logging;

// Re-export commonly used items
pub use forward::{
    forward, forward_arg, forward_charp, forward_int, forward_ulint, forward_voidp, relay,
    ArgKind, Callback, Handle, TrailingArg, VaArg, VariadicFn,
};
pub use binding::Binding;
pub use config::{Config, ConfigError, LibraryConfig, LoggingConfig};
pub use errors::{Error, Result};
pub use library::{Library, LoadError, SymbolError};
pub use logging::LogConfig;
pub use probes::ProbeMismatch;
pub use setter::{OptionSetter, SetterError, StatusCode};
