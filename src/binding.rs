//! Library plus resolved option setter, opened from configuration

use tracing::info;

use crate::config::LibraryConfig;
use crate::errors::Result;
use crate::forward::Callback;
use crate::library::Library;
use crate::logging::TARGET_LIBRARY;
use crate::setter::OptionSetter;

/// An opened library and its option setter
///
/// Owning the `Library` keeps every callback resolved through it valid for
/// as long as the binding lives.
#[derive(Debug)]
pub struct Binding {
    setter: OptionSetter,
    library: Library,
}

impl Binding {
    /// Open `config.path` and resolve `config.setter`
    ///
    /// # Safety
    /// The setter symbol must be an `int name(const char *, ...)` option
    /// setter, as required by [`OptionSetter::new`].
    pub unsafe fn open(config: &LibraryConfig) -> Result<Self> {
        let library = Library::open(&config.path)?;
        let callback = library.variadic(&config.setter)?;
        let setter = OptionSetter::from_callback(callback).with_success_code(config.success_code);

        info!(
            target: TARGET_LIBRARY,
            library = %config.path,
            setter = %config.setter,
            success_code = config.success_code,
            "binding opened"
        );

        Ok(Self { setter, library })
    }

    pub fn setter(&self) -> &OptionSetter {
        &self.setter
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Resolve another variadic function from the same library
    ///
    /// # Safety
    /// See [`Library::variadic`]. The callback is valid while `self` is.
    pub unsafe fn callback(&self, name: &str) -> Result<Callback> {
        Ok(self.library.variadic(name)?)
    }
}
