//! Platform loading of the audio driver library.

use crate::error::{AlError, Result};
use std::ffi::c_void;
use std::ptr::NonNull;

/// Platform-conventional name of the driver library.
#[cfg(windows)]
pub const DEFAULT_LIBRARY: &str = "OpenAL32.dll";
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY: &str = "/System/Library/Frameworks/OpenAL.framework/OpenAL";
#[cfg(all(unix, not(target_os = "macos")))]
pub const DEFAULT_LIBRARY: &str = "libopenal.so";

/// Something that can hand out entry points by symbol name.
///
/// # Safety
///
/// Every non-null pointer returned by [`symbol`](SymbolSource::symbol) must be
/// the address of a function with the driver ABI signature for that name, and
/// must stay valid for as long as the implementor is alive.
pub unsafe trait SymbolSource {
    /// Name used in log lines and error messages.
    fn describe(&self) -> &str;

    /// Looks up `name` (e.g. `"alSourcePlay"`). `None` if the symbol is absent.
    fn symbol(&self, name: &str) -> Option<NonNull<c_void>>;
}

/// A driver shared library opened at runtime.
pub struct DriverLibrary {
    name: String,
    inner: libloading::Library,
}

impl DriverLibrary {
    /// Opens the library by file name or path.
    pub fn open(name: &str) -> Result<Self> {
        log::debug!("Loading audio library {}", name);
        let inner = open_raw(name).map_err(|e| AlError::LibraryLoad {
            library: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            inner,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// SAFETY: symbols are resolved from a real driver library whose exported
// entry points follow the driver ABI; the library handle is owned by self.
unsafe impl SymbolSource for DriverLibrary {
    fn describe(&self) -> &str {
        &self.name
    }

    fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
        // SAFETY: the symbol is only read as an address here; callers cast it
        // to the signature declared for that name.
        let symbol = unsafe { self.inner.get::<*mut c_void>(name.as_bytes()) }.ok()?;
        NonNull::new(*symbol)
    }
}

#[cfg(unix)]
fn open_raw(name: &str) -> std::result::Result<libloading::Library, libloading::Error> {
    use libloading::os::unix::{Library, RTLD_LAZY};
    // SAFETY: loading runs the library's initializers; driver libraries are
    // expected to be well behaved on load.
    unsafe { Library::open(Some(name), RTLD_LAZY) }.map(Into::into)
}

#[cfg(windows)]
fn open_raw(name: &str) -> std::result::Result<libloading::Library, libloading::Error> {
    use libloading::os::windows::Library;
    // SAFETY: see the unix variant.
    unsafe { Library::new(name) }.map(Into::into)
}
