//! Convenience functions for interacting with ffi calls to vulkan.

use std::{
    ffi::{CStr, CString, NulError},
    os::raw::c_char,
};

/// Build a vector of pointers to c-style strings from a slice of rust strings.
///
/// The returned pointers are only valid while the returned CStrings are
/// alive, so callers must keep both in scope until the Vulkan call returns.
pub fn to_os_ptrs(
    strings: &[String],
) -> Result<(Vec<CString>, Vec<*const c_char>), NulError> {
    let cstrings = strings
        .iter()
        .cloned()
        .map(CString::new)
        .collect::<Result<Vec<CString>, NulError>>()?;
    let ptrs = cstrings
        .iter()
        .map(|cstr| cstr.as_ptr())
        .collect::<Vec<*const c_char>>();
    Ok((cstrings, ptrs))
}

/// Convert a static c-style name, like an extension name constant, to an
/// owned rust string.
pub fn to_owned_name(name: &CStr) -> String {
    name.to_string_lossy().into_owned()
}
