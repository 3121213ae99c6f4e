//! Reference variadic callbacks
//!
//! Compiled from `csrc/probes.c` by the build script. Each probe is a genuine
//! C variadic function reading its trailing argument with `va_arg`, which
//! makes them useful for checking that the forwarders agree with the
//! platform's variadic ABI.

use core::ffi::{c_char, c_int, c_ulong, c_void};
use std::ffi::CStr;

use tracing::{debug, warn};

use crate::forward::{forward_charp, forward_int, forward_ulint, forward_voidp, ArgKind, VariadicFn};
use crate::logging::TARGET_PROBES;
use crate::setter::StatusCode;

extern "C" {
    fn devaarg_probe_int(first: *const c_char, ...) -> *mut c_void;
    fn devaarg_probe_ulint(first: *const c_char, ...) -> *mut c_void;
    fn devaarg_probe_charp_len(first: *const c_char, ...) -> *mut c_void;
    fn devaarg_probe_voidp(first: *const c_char, ...) -> *mut c_void;
    fn devaarg_probe_first(first: *const c_char, ...) -> *mut c_void;
    fn devaarg_probe_cfg_set(name: *const c_char, ...) -> *mut c_void;
}

/// Returns its trailing `int`, sign-extended to pointer size
pub fn int_identity() -> VariadicFn {
    devaarg_probe_int
}

/// Returns its trailing `unsigned long`
pub fn ulint_identity() -> VariadicFn {
    devaarg_probe_ulint
}

/// Returns `strlen` of its trailing `char *` (null for a null string)
pub fn charp_len() -> VariadicFn {
    devaarg_probe_charp_len
}

/// Returns its trailing `void *`
pub fn voidp_identity() -> VariadicFn {
    devaarg_probe_voidp
}

/// Returns its first argument, ignoring the rest
pub fn first_echo() -> VariadicFn {
    devaarg_probe_first
}

/// Option setter over a fixed table, returning engine status codes
///
/// | option             | trailing type   | accepted                         |
/// |--------------------|-----------------|----------------------------------|
/// | `open_files`       | `int`           | `> 0`                            |
/// | `buffer_pool_size` | `unsigned long` | `>= 5 MiB`                       |
/// | `doublewrite`      | `unsigned long` | `0` or `1`                       |
/// | `flush_method`     | `char *`        | `fsync`, `O_DSYNC`, `O_DIRECT`   |
/// | `log_callback`     | `void *`        | non-null                         |
/// | `read_only`        | any             | never (`DB_READONLY`)            |
///
/// Unknown names give `DB_NOT_FOUND`, rejected values `DB_INVALID_INPUT`.
pub fn cfg_set() -> VariadicFn {
    devaarg_probe_cfg_set
}

/// Success code reported by [`cfg_set`]
pub const CFG_SET_SUCCESS: c_int = StatusCode::DB_SUCCESS;

/// A forwarder returned something other than what its probe should produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeMismatch {
    pub kind: ArgKind,
    pub expected: usize,
    pub got: usize,
}

impl core::fmt::Display for ProbeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "forward_{} returned {:#x}, expected {:#x}",
            self.kind, self.got, self.expected
        )
    }
}

impl std::error::Error for ProbeMismatch {}

fn check(kind: ArgKind, expected: usize, got: usize) -> Result<(), ProbeMismatch> {
    if expected == got {
        debug!(target: TARGET_PROBES, kind = kind.name(), "probe ok");
        Ok(())
    } else {
        warn!(target: TARGET_PROBES, kind = kind.name(), expected, got, "probe mismatch");
        Err(ProbeMismatch { kind, expected, got })
    }
}

/// Run every typed forwarder against its probe
///
/// Uses values that are truncated or sign-mangled by a wrong ABI: a negative
/// `int`, an `unsigned long` with the top bit set, a non-trivial string and
/// a stack address.
pub fn self_check() -> Result<(), ProbeMismatch> {
    let tag = CStr::from_bytes_with_nul(b"self-check\0").unwrap_or_default();
    let text = CStr::from_bytes_with_nul(b"forwarded\0").unwrap_or_default();
    let mut slot = 0u64;
    let slot_ptr = (&mut slot as *mut u64).cast::<c_void>();

    // SAFETY: each probe reads exactly the trailing type its adapter passes,
    // and every argument outlives its call.
    unsafe {
        let got = forward_int(int_identity(), tag.as_ptr(), -42).as_isize();
        check(ArgKind::Int, -42isize as usize, got as usize)?;

        let big = c_ulong::MAX;
        let got = forward_ulint(ulint_identity(), tag.as_ptr(), big).addr();
        check(ArgKind::ULong, big as usize, got)?;

        let got = forward_charp(charp_len(), tag.as_ptr(), text.as_ptr()).addr();
        check(ArgKind::Text, text.to_bytes().len(), got)?;

        let got = forward_voidp(voidp_identity(), tag.as_ptr(), slot_ptr).addr();
        check(ArgKind::Pointer, slot_ptr as usize, got)?;
    }

    debug!(target: TARGET_PROBES, "variadic self-check passed");
    Ok(())
}
