//! Dynamic library loading and variadic symbol resolution
//!
//! Platform-agnostic wrapper around dlopen/LoadLibrary.

use core::ffi::c_void;
use core::ptr::NonNull;
use std::ffi::CString;

use tracing::{debug, warn};

use crate::forward::Callback;
use crate::logging::TARGET_LIBRARY;

/// Handle to a dynamically loaded library, closed on drop
pub struct Library {
    handle: NonNull<c_void>,
    name: String,
}

impl Library {
    /// Load a library by name, searching the platform's library paths
    pub fn open(name: &str) -> Result<Self, LoadError> {
        let cname = CString::new(name).map_err(|_| LoadError::InvalidName(name.to_string()))?;

        match Self::open_impl(&cname) {
            Ok(handle) => {
                debug!(target: TARGET_LIBRARY, library = name, "library loaded");
                Ok(Self {
                    handle,
                    name: name.to_string(),
                })
            }
            Err(msg) => {
                warn!(target: TARGET_LIBRARY, library = name, error = %msg, "library load failed");
                Err(LoadError::LoadFailed {
                    name: name.to_string(),
                    message: msg,
                })
            }
        }
    }

    /// Load a library from an explicit path
    pub fn open_path(path: &std::path::Path) -> Result<Self, LoadError> {
        let name = path
            .to_str()
            .ok_or_else(|| LoadError::InvalidName(path.display().to_string()))?;
        Self::open(name)
    }

    #[cfg(unix)]
    fn open_impl(name: &CString) -> Result<NonNull<c_void>, String> {
        // SAFETY: `name` is NUL-terminated; dlerror is read on the same thread
        unsafe {
            let handle = libc::dlopen(name.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL);
            NonNull::new(handle).ok_or_else(|| last_dl_error())
        }
    }

    #[cfg(windows)]
    fn open_impl(name: &CString) -> Result<NonNull<c_void>, String> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;

        extern "system" {
            fn LoadLibraryW(filename: *const u16) -> *mut c_void;
            fn GetLastError() -> u32;
        }

        let wide: Vec<u16> = OsStr::new(&*name.to_string_lossy())
            .encode_wide()
            .chain(Some(0))
            .collect();

        unsafe {
            let handle = LoadLibraryW(wide.as_ptr());
            NonNull::new(handle).ok_or_else(|| format!("error code {}", GetLastError()))
        }
    }

    /// Name the library was opened with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address of an exported symbol
    pub fn symbol(&self, name: &str) -> Result<NonNull<c_void>, SymbolError> {
        let cname = CString::new(name).map_err(|_| SymbolError::InvalidName(name.to_string()))?;

        match NonNull::new(self.symbol_impl(&cname)) {
            Some(ptr) => {
                debug!(target: TARGET_LIBRARY, library = %self.name, symbol = name, address = ?ptr, "symbol resolved");
                Ok(ptr)
            }
            None => {
                warn!(target: TARGET_LIBRARY, library = %self.name, symbol = name, "symbol not found");
                Err(SymbolError::NotFound {
                    library: self.name.clone(),
                    symbol: name.to_string(),
                })
            }
        }
    }

    /// Resolve an exported `void *name(char *, ...)` function
    ///
    /// # Safety
    /// The symbol must be a function with that signature. The returned
    /// callback must not be called after this library is dropped.
    pub unsafe fn variadic(&self, name: &str) -> Result<Callback, SymbolError> {
        let ptr = self.symbol(name)?;
        Callback::from_raw(ptr.as_ptr()).ok_or_else(|| SymbolError::NotFound {
            library: self.name.clone(),
            symbol: name.to_string(),
        })
    }

    #[cfg(unix)]
    fn symbol_impl(&self, name: &CString) -> *mut c_void {
        // SAFETY: handle is live for `&self`, name is NUL-terminated
        unsafe { libc::dlsym(self.handle.as_ptr(), name.as_ptr()) }
    }

    #[cfg(windows)]
    fn symbol_impl(&self, name: &CString) -> *mut c_void {
        extern "system" {
            fn GetProcAddress(module: *mut c_void, name: *const u8) -> *mut c_void;
        }

        unsafe { GetProcAddress(self.handle.as_ptr(), name.as_ptr().cast()) }
    }
}

#[cfg(unix)]
unsafe fn last_dl_error() -> String {
    let err = libc::dlerror();
    if err.is_null() {
        "unknown error".into()
    } else {
        std::ffi::CStr::from_ptr(err).to_string_lossy().into_owned()
    }
}

impl Drop for Library {
    #[cfg(unix)]
    fn drop(&mut self) {
        debug!(target: TARGET_LIBRARY, library = %self.name, "closing library");
        unsafe {
            libc::dlclose(self.handle.as_ptr());
        }
    }

    #[cfg(windows)]
    fn drop(&mut self) {
        extern "system" {
            fn FreeLibrary(module: *mut c_void) -> i32;
        }
        debug!(target: TARGET_LIBRARY, library = %self.name, "closing library");
        unsafe {
            FreeLibrary(self.handle.as_ptr());
        }
    }
}

impl core::fmt::Debug for Library {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Library")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .finish()
    }
}

unsafe impl Send for Library {}
unsafe impl Sync for Library {}

/// Library loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    InvalidName(String),
    LoadFailed { name: String, message: String },
}

impl core::fmt::Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "Invalid library name: {:?}", name),
            Self::LoadFailed { name, message } => {
                write!(f, "Failed to load library '{}': {}", name, message)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Symbol lookup errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    InvalidName(String),
    NotFound { library: String, symbol: String },
}

impl core::fmt::Display for SymbolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "Invalid symbol name: {:?}", name),
            Self::NotFound { library, symbol } => {
                write!(f, "Symbol '{}' not found in '{}'", symbol, library)
            }
        }
    }
}

impl std::error::Error for SymbolError {}
