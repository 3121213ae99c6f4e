//! Value types crossing the forwarding boundary
//!
//! `Handle` is what comes back, `TrailingArg` is what goes in when the
//! trailing type is only known at run time.

use core::ffi::{c_char, c_int, c_ulong, c_void};
use core::fmt;

/// Opaque pointer-sized result of a forwarded call
///
/// The forwarder never interprets it. Callers that know what the callback
/// returns read it back with [`Handle::as_ptr`], [`Handle::addr`] or
/// [`Handle::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle(*mut c_void);

impl Handle {
    /// Null handle
    #[inline]
    pub const fn null() -> Self {
        Self(core::ptr::null_mut())
    }

    /// Wrap a raw pointer returned by a callback
    #[inline]
    pub const fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Build a handle carrying an integer in pointer-sized form
    #[inline]
    pub fn from_addr(addr: usize) -> Self {
        Self(addr as *mut c_void)
    }

    #[inline]
    pub const fn as_ptr(self) -> *mut c_void {
        self.0
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// Handle bits as an unsigned integer
    #[inline]
    pub fn addr(self) -> usize {
        self.0 as usize
    }

    /// Handle bits as a signed integer
    #[inline]
    pub fn as_isize(self) -> isize {
        self.0 as isize
    }

    /// Low `int` bits, for callbacks that really return an `int` status
    ///
    /// Only the low bits of the return register are defined for such
    /// callbacks, so the upper bits are discarded.
    #[inline]
    pub fn status(self) -> c_int {
        self.addr() as c_int
    }
}

impl Default for Handle {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl From<*mut c_void> for Handle {
    #[inline]
    fn from(ptr: *mut c_void) -> Self {
        Self(ptr)
    }
}

impl From<Handle> for *mut c_void {
    #[inline]
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Pointer for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.0, f)
    }
}

/// Trailing argument type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArgKind {
    /// `char *`
    Text,
    /// `int`
    Int,
    /// `unsigned long int`
    ULong,
    /// `void *`
    Pointer,
}

impl ArgKind {
    pub const ALL: [ArgKind; 4] = [Self::Text, Self::Int, Self::ULong, Self::Pointer];

    /// Short C-flavoured name, as used in the exported symbol suffixes
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "charp",
            Self::Int => "int",
            Self::ULong => "ulint",
            Self::Pointer => "voidp",
        }
    }

    /// Size of the passed value in bytes
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::Text => core::mem::size_of::<*const c_char>(),
            Self::Int => core::mem::size_of::<c_int>(),
            Self::ULong => core::mem::size_of::<c_ulong>(),
            Self::Pointer => core::mem::size_of::<*mut c_void>(),
        }
    }

    #[inline]
    pub const fn is_pointer(self) -> bool {
        matches!(self, Self::Text | Self::Pointer)
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime-typed trailing argument
///
/// Tagged alternative to picking a `forward_*` adapter at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingArg {
    Text(*const c_char),
    Int(c_int),
    ULong(c_ulong),
    Pointer(*mut c_void),
}

impl TrailingArg {
    #[inline]
    pub const fn kind(&self) -> ArgKind {
        match self {
            Self::Text(_) => ArgKind::Text,
            Self::Int(_) => ArgKind::Int,
            Self::ULong(_) => ArgKind::ULong,
            Self::Pointer(_) => ArgKind::Pointer,
        }
    }
}

impl From<*const c_char> for TrailingArg {
    #[inline]
    fn from(value: *const c_char) -> Self {
        Self::Text(value)
    }
}

impl From<c_int> for TrailingArg {
    #[inline]
    fn from(value: c_int) -> Self {
        Self::Int(value)
    }
}

impl From<c_ulong> for TrailingArg {
    #[inline]
    fn from(value: c_ulong) -> Self {
        Self::ULong(value)
    }
}

impl From<*mut c_void> for TrailingArg {
    #[inline]
    fn from(value: *mut c_void) -> Self {
        Self::Pointer(value)
    }
}
