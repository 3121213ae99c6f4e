//! C ABI
//!
//! Exports the four forwarders under their historical names so a foreign
//! runtime can load this crate's shared library in place of the C helper:
//!
//! ```c
//! void *charp__charp(void *(*func)(char *, ...), char *a, char *b);
//! void *charp__int(void *(*func)(char *, ...), char *a, int b);
//! void *charp__ulint(void *(*func)(char *, ...), char *a, unsigned long int b);
//! void *charp__voidp(void *(*func)(char *, ...), char *a, void *b);
//! ```
//!
//! A null `func` cannot be represented by a Rust fn pointer, so it arrives
//! as `None` and yields a null result.

use core::ffi::{c_char, c_int, c_ulong, c_void};

use crate::forward::{self, VaArg, VariadicFn};
use crate::{logging, probes};

#[inline]
unsafe fn forward_or_null<T: VaArg>(
    func: Option<VariadicFn>,
    a: *const c_char,
    b: T,
) -> *mut c_void {
    match func {
        Some(func) => forward::forward(func, a, b).as_ptr(),
        None => core::ptr::null_mut(),
    }
}

/// # Safety
/// `func` must accept `(char *, char *)`; `a` and `b` must be valid for the call.
#[export_name = "charp__charp"]
pub unsafe extern "C" fn charp_charp(
    func: Option<VariadicFn>,
    a: *const c_char,
    b: *const c_char,
) -> *mut c_void {
    forward_or_null(func, a, b)
}

/// # Safety
/// `func` must accept `(char *, int)`; `a` must be valid for the call.
#[export_name = "charp__int"]
pub unsafe extern "C" fn charp_int(
    func: Option<VariadicFn>,
    a: *const c_char,
    b: c_int,
) -> *mut c_void {
    forward_or_null(func, a, b)
}

/// # Safety
/// `func` must accept `(char *, unsigned long)`; `a` must be valid for the call.
#[export_name = "charp__ulint"]
pub unsafe extern "C" fn charp_ulint(
    func: Option<VariadicFn>,
    a: *const c_char,
    b: c_ulong,
) -> *mut c_void {
    forward_or_null(func, a, b)
}

/// # Safety
/// `func` must accept `(char *, void *)`; `a` and `b` must be valid for the call.
#[export_name = "charp__voidp"]
pub unsafe extern "C" fn charp_voidp(
    func: Option<VariadicFn>,
    a: *const c_char,
    b: *mut c_void,
) -> *mut c_void {
    forward_or_null(func, a, b)
}

/// Install the logging subscriber from `devaarg.toml` and `DEVAARG_*`
/// Returns 0 on success, -1 when the configuration is invalid
#[no_mangle]
pub extern "C" fn devaarg_init_logging() -> c_int {
    match logging::init() {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

/// Run the variadic ABI self-check
/// Returns 0 on success, -1 on mismatch
#[no_mangle]
pub extern "C" fn devaarg_self_check() -> c_int {
    match probes::self_check() {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    fn tag() -> &'static CStr {
        CStr::from_bytes_with_nul(b"tag\0").unwrap()
    }

    #[test]
    fn test_exports_match_adapters() {
        let text = CStr::from_bytes_with_nul(b"hello\0").unwrap();
        let mut slot = 7u8;
        let slot_ptr = (&mut slot as *mut u8).cast::<c_void>();

        unsafe {
            assert_eq!(charp_int(Some(probes::int_identity()), tag().as_ptr(), 42) as usize, 42);
            assert_eq!(
                charp_charp(Some(probes::charp_len()), tag().as_ptr(), text.as_ptr()) as usize,
                5
            );
            assert_eq!(
                charp_ulint(Some(probes::ulint_identity()), tag().as_ptr(), c_ulong::MAX) as usize,
                c_ulong::MAX as usize
            );
            assert_eq!(charp_voidp(Some(probes::voidp_identity()), tag().as_ptr(), slot_ptr), slot_ptr);
        }
    }

    #[test]
    fn test_null_callback_yields_null() {
        unsafe {
            assert!(charp_int(None, tag().as_ptr(), 1).is_null());
            assert!(charp_charp(None, tag().as_ptr(), tag().as_ptr()).is_null());
            assert!(charp_ulint(None, tag().as_ptr(), 1).is_null());
            assert!(charp_voidp(None, tag().as_ptr(), core::ptr::null_mut()).is_null());
        }
    }

    #[test]
    fn test_self_check_export() {
        assert_eq!(devaarg_self_check(), 0);
    }
}
