//! Trailing argument types accepted by the forwarder
//!
//! `VaArg` is sealed: only types with a well-defined C variadic promotion are
//! implemented, so an unsupported type (`f32`, `bool`, `u8`, ...) is a
//! compile error rather than a silent ABI mismatch.

use core::ffi::{c_char, c_int, c_ulong, c_void};

use super::types::{ArgKind, TrailingArg};
use super::VariadicFn;

mod sealed {
    pub trait Sealed {}
}

/// A value that can be passed as the single trailing variadic argument
pub trait VaArg: Copy + sealed::Sealed {
    /// Tag of the C type this value is passed as
    const KIND: ArgKind;

    /// Invoke `callback(first, self)`
    ///
    /// # Safety
    /// `callback` must read exactly one trailing argument of `Self::KIND`.
    unsafe fn pass_to(self, callback: VariadicFn, first: *const c_char) -> *mut c_void;

    /// Erase the static type into a tagged argument
    fn into_arg(self) -> TrailingArg;
}

macro_rules! va_arg {
    ($ty:ty => $kind:ident as $inner:ty) => {
        impl sealed::Sealed for $ty {}

        impl VaArg for $ty {
            const KIND: ArgKind = ArgKind::$kind;

            #[inline(always)]
            unsafe fn pass_to(self, callback: VariadicFn, first: *const c_char) -> *mut c_void {
                callback(first, self)
            }

            #[inline]
            fn into_arg(self) -> TrailingArg {
                TrailingArg::$kind(self as $inner)
            }
        }
    };
}

va_arg!(*const c_char => Text as *const c_char);
va_arg!(*mut c_char => Text as *const c_char);
va_arg!(c_int => Int as c_int);
va_arg!(c_ulong => ULong as c_ulong);
va_arg!(*mut c_void => Pointer as *mut c_void);
va_arg!(*const c_void => Pointer as *mut c_void);
