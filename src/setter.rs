//! Typed option setter over a variadic `(name, ...) -> status` function
//!
//! Embedded engines commonly expose one configuration entry point whose
//! trailing argument type depends on the option name, e.g.
//! `ib_err_t ib_cfg_set(const char *name, ...)`. `OptionSetter` gives each
//! value type its own method and turns the status code into a `Result`.

use core::ffi::{c_int, c_ulong, c_void};
use std::ffi::CString;

use tracing::{debug, warn};

use crate::forward::{Callback, Handle, TrailingArg, VaArg, VariadicFn};
use crate::logging::TARGET_SETTER;

/// Well-known status codes of the embedded engine's C API
pub struct StatusCode;

impl StatusCode {
    pub const DB_SUCCESS: c_int = 10;
    pub const DB_ERROR: c_int = 11;
    pub const DB_NOT_FOUND: c_int = 2003;
    pub const DB_READONLY: c_int = 2004;
    pub const DB_INVALID_INPUT: c_int = 2005;

    /// Symbolic name for a known code
    pub fn name(code: c_int) -> Option<&'static str> {
        match code {
            Self::DB_SUCCESS => Some("DB_SUCCESS"),
            Self::DB_ERROR => Some("DB_ERROR"),
            Self::DB_NOT_FOUND => Some("DB_NOT_FOUND"),
            Self::DB_READONLY => Some("DB_READONLY"),
            Self::DB_INVALID_INPUT => Some("DB_INVALID_INPUT"),
            _ => None,
        }
    }
}

/// Boolean option values travel as `unsigned long` (`ib_bool_t`)
pub const IB_TRUE: c_ulong = 1;
pub const IB_FALSE: c_ulong = 0;

/// Option setter errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetterError {
    /// Option name contains an interior NUL
    InvalidName(String),
    /// Text value contains an interior NUL
    InvalidText { name: String },
    /// The setter returned a status other than the success code
    Rejected { name: String, code: c_int },
}

impl core::fmt::Display for SetterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "Invalid option name: {:?}", name),
            Self::InvalidText { name } => {
                write!(f, "Invalid text value for option '{}'", name)
            }
            Self::Rejected { name, code } => match StatusCode::name(*code) {
                Some(sym) => write!(f, "Option '{}' rejected: {} ({})", name, sym, code),
                None => write!(f, "Option '{}' rejected with status {}", name, code),
            },
        }
    }
}

impl std::error::Error for SetterError {}

/// Typed front end for a variadic option setter
#[derive(Debug, Clone, Copy)]
pub struct OptionSetter {
    callback: Callback,
    success: c_int,
}

impl OptionSetter {
    /// Wrap a setter function
    ///
    /// # Safety
    /// `func` must behave as `int func(const char *name, ...)`, reading a
    /// trailing argument of the type each option name expects. Every `set_*`
    /// call relies on this.
    pub unsafe fn new(func: VariadicFn) -> Self {
        Self::from_callback(Callback::new(func))
    }

    /// # Safety
    /// See [`OptionSetter::new`].
    pub unsafe fn from_callback(callback: Callback) -> Self {
        Self {
            callback,
            success: StatusCode::DB_SUCCESS,
        }
    }

    /// Status code the setter reports on success
    pub fn with_success_code(mut self, code: c_int) -> Self {
        self.success = code;
        self
    }

    pub fn success_code(&self) -> c_int {
        self.success
    }

    pub fn callback(&self) -> Callback {
        self.callback
    }

    pub fn set_int(&self, name: &str, value: c_int) -> Result<(), SetterError> {
        self.set_typed(name, value)
    }

    pub fn set_ulint(&self, name: &str, value: c_ulong) -> Result<(), SetterError> {
        self.set_typed(name, value)
    }

    pub fn set_bool(&self, name: &str, value: bool) -> Result<(), SetterError> {
        self.set_typed(name, if value { IB_TRUE } else { IB_FALSE })
    }

    pub fn set_bool_on(&self, name: &str) -> Result<(), SetterError> {
        self.set_bool(name, true)
    }

    pub fn set_bool_off(&self, name: &str) -> Result<(), SetterError> {
        self.set_bool(name, false)
    }

    /// Set a text option
    ///
    /// The string is only guaranteed to live for the duration of the call;
    /// setters that keep the pointer must copy it.
    pub fn set_text(&self, name: &str, value: &str) -> Result<(), SetterError> {
        let text = CString::new(value).map_err(|_| SetterError::InvalidText {
            name: name.to_string(),
        })?;
        self.set_typed(name, text.as_ptr())
    }

    /// Set a pointer-valued option, typically a callback the engine will call
    pub fn set_callback(&self, name: &str, value: *mut c_void) -> Result<(), SetterError> {
        self.set_typed(name, value)
    }

    /// Set an option from a runtime-typed value
    pub fn set(&self, name: &str, value: TrailingArg) -> Result<(), SetterError> {
        let cname = option_name(name)?;
        debug!(target: TARGET_SETTER, option = name, kind = value.kind().name(), "setting option");
        // SAFETY: upheld by the constructor's contract
        let handle = unsafe { self.callback.call_arg(&cname, value) };
        self.check(name, handle)
    }

    fn set_typed<T: VaArg>(&self, name: &str, value: T) -> Result<(), SetterError> {
        let cname = option_name(name)?;
        debug!(target: TARGET_SETTER, option = name, kind = T::KIND.name(), "setting option");
        // SAFETY: upheld by the constructor's contract
        let handle = unsafe { self.callback.call(&cname, value) };
        self.check(name, handle)
    }

    fn check(&self, name: &str, handle: Handle) -> Result<(), SetterError> {
        let code = handle.status();
        if code == self.success {
            Ok(())
        } else {
            warn!(target: TARGET_SETTER, option = name, code, "option rejected");
            Err(SetterError::Rejected {
                name: name.to_string(),
                code,
            })
        }
    }
}

fn option_name(name: &str) -> Result<CString, SetterError> {
    CString::new(name).map_err(|_| SetterError::InvalidName(name.to_string()))
}
