//! Typed forwarding into C variadic callbacks
//!
//! Design: one generic body, one thin adapter per supported trailing type.
//!
//! Every adapter has the shape `forward(callback, first, value) -> Handle` and
//! does nothing but call `callback(first, value)` through the platform's
//! variadic calling convention and hand the result back untouched. No state,
//! no logging, no allocation.
//!
//! A Rust function pointer is never null, so a null callback cannot be
//! written:
//!
//! ```compile_fail
//! use devaarg::forward_int;
//!
//! let first = b"x\0".as_ptr().cast();
//! let _ = unsafe { forward_int(core::ptr::null(), first, 42) };
//! ```
//!
//! The signature match between adapter and callback cannot be checked, which
//! is why every variadic entry point is `unsafe`.

mod arg;
mod types;

pub use arg::VaArg;
pub use types::{ArgKind, Handle, TrailingArg};

use core::ffi::{c_char, c_int, c_ulong, c_void};
use std::ffi::CStr;

/// C callback shape: `void *(*)(char *, ...)`
pub type VariadicFn = unsafe extern "C" fn(*const c_char, ...) -> *mut c_void;

/// Forward `value` to `callback` as its single trailing argument
///
/// # Safety
/// - `callback` must accept `(char *, T)` and return a pointer-sized value
/// - `first` and `value` must stay valid for the duration of the call
#[inline]
pub unsafe fn forward<T: VaArg>(callback: VariadicFn, first: *const c_char, value: T) -> Handle {
    Handle::from_ptr(value.pass_to(callback, first))
}

/// Forward a text pointer (`char *`)
///
/// # Safety
/// See [`forward`].
#[inline]
pub unsafe fn forward_charp(
    callback: VariadicFn,
    first: *const c_char,
    value: *const c_char,
) -> Handle {
    forward(callback, first, value)
}

/// Forward an `int`
///
/// # Safety
/// See [`forward`].
#[inline]
pub unsafe fn forward_int(callback: VariadicFn, first: *const c_char, value: c_int) -> Handle {
    forward(callback, first, value)
}

/// Forward an `unsigned long int`
///
/// # Safety
/// See [`forward`].
#[inline]
pub unsafe fn forward_ulint(callback: VariadicFn, first: *const c_char, value: c_ulong) -> Handle {
    forward(callback, first, value)
}

/// Forward an opaque pointer (`void *`)
///
/// # Safety
/// See [`forward`].
#[inline]
pub unsafe fn forward_voidp(
    callback: VariadicFn,
    first: *const c_char,
    value: *mut c_void,
) -> Handle {
    forward(callback, first, value)
}

/// Forward a runtime-typed argument, dispatching on its tag
///
/// # Safety
/// `callback` must expect the trailing type named by `arg.kind()`;
/// otherwise as [`forward`].
#[inline]
pub unsafe fn forward_arg(callback: VariadicFn, first: *const c_char, arg: TrailingArg) -> Handle {
    match arg {
        TrailingArg::Text(v) => forward(callback, first, v),
        TrailingArg::Int(v) => forward(callback, first, v),
        TrailingArg::ULong(v) => forward(callback, first, v),
        TrailingArg::Pointer(v) => forward(callback, first, v),
    }
}

/// Forward to a Rust callable
///
/// Same shape as the variadic adapters, resolved entirely at compile time.
#[inline]
pub fn relay<F, T, R>(callback: F, first: &CStr, value: T) -> R
where
    F: FnOnce(&CStr, T) -> R,
{
    callback(first, value)
}

/// Variadic callback whose signature the holder has vouched for
///
/// Copyable, non-null. Built from a fn pointer or a resolved symbol.
#[derive(Clone, Copy)]
pub struct Callback {
    func: VariadicFn,
}

impl Callback {
    /// Wrap a variadic function pointer
    ///
    /// # Safety
    /// `func` must be callable as `void *(*)(char *, ...)` for as long as the
    /// returned value is used.
    #[inline]
    pub const unsafe fn new(func: VariadicFn) -> Self {
        Self { func }
    }

    /// Wrap a raw code address, `None` if null
    ///
    /// # Safety
    /// A non-null `ptr` must be the entry point of a function with the
    /// `VariadicFn` signature that outlives the returned value.
    #[inline]
    pub unsafe fn from_raw(ptr: *const c_void) -> Option<Self> {
        if ptr.is_null() {
            None
        } else {
            Some(Self {
                func: core::mem::transmute::<*const c_void, VariadicFn>(ptr),
            })
        }
    }

    #[inline]
    pub fn as_fn(&self) -> VariadicFn {
        self.func
    }

    #[inline]
    pub fn as_raw(&self) -> *const c_void {
        self.func as *const c_void
    }

    /// `callback(first, value)`
    ///
    /// # Safety
    /// The callback must read a trailing `T`, and both arguments must stay
    /// valid for the call.
    #[inline]
    pub unsafe fn call<T: VaArg>(&self, first: &CStr, value: T) -> Handle {
        forward(self.func, first.as_ptr(), value)
    }

    /// `callback(first, arg)` with a runtime-typed trailing argument
    ///
    /// # Safety
    /// See [`Callback::call`].
    #[inline]
    pub unsafe fn call_arg(&self, first: &CStr, arg: TrailingArg) -> Handle {
        forward_arg(self.func, first.as_ptr(), arg)
    }
}

impl core::fmt::Debug for Callback {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Callback").field(&self.as_raw()).finish()
    }
}
