//! Raw FFI surface of the libsass C API.
//!
//! libsass is opened at runtime with `libloading` rather than linked, so the
//! workspace builds on machines without it. [`SassApi`] is the resolved symbol
//! table; every function in it is `unsafe` and follows the ownership rules of
//! `sass/context.h`:
//!
//! - `sass_make_data_context` takes ownership of its source string, which
//!   must come from `sass_copy_c_string` (libsass frees it with `free`).
//!   If the context cannot be made, the copy is still the caller's and goes
//!   back through `sass_free_memory`.
//! - every other `const char*` argument is copied by libsass.
//! - strings returned by `sass_context_get_*` live inside the context and are
//!   freed by `sass_delete_*_context`.

#![allow(non_camel_case_types)]

use std::os::raw::{c_char, c_int, c_void};

use libloading::Library;

/// Opaque `struct Sass_Context`, the common base of data and file contexts.
#[repr(C)]
pub struct Sass_Context {
    _private: [u8; 0],
}

/// Opaque `struct Sass_Data_Context`.
#[repr(C)]
pub struct Sass_Data_Context {
    _private: [u8; 0],
}

/// Opaque `struct Sass_File_Context`.
#[repr(C)]
pub struct Sass_File_Context {
    _private: [u8; 0],
}

/// Opaque `struct Sass_Options`.
#[repr(C)]
pub struct Sass_Options {
    _private: [u8; 0],
}

/// `enum Sass_Output_Style`.
pub type Sass_Output_Style = c_int;

pub const SASS_STYLE_NESTED: Sass_Output_Style = 0;
pub const SASS_STYLE_EXPANDED: Sass_Output_Style = 1;
pub const SASS_STYLE_COMPACT: Sass_Output_Style = 2;
pub const SASS_STYLE_COMPRESSED: Sass_Output_Style = 3;

/// File names tried, in order, when locating libsass.
#[cfg(target_os = "linux")]
pub const LIBRARY_NAMES: &[&str] = &["libsass.so.1", "libsass.so"];
#[cfg(target_os = "macos")]
pub const LIBRARY_NAMES: &[&str] = &["libsass.1.dylib", "libsass.dylib"];
#[cfg(windows)]
pub const LIBRARY_NAMES: &[&str] = &["libsass.dll", "sass.dll"];
#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
pub const LIBRARY_NAMES: &[&str] = &["libsass.so"];

/// A symbol the opened library does not export.
#[derive(Debug, thiserror::Error)]
#[error("libsass symbol `{name}` not found: {source}")]
pub struct MissingSymbol {
    pub name: &'static str,
    #[source]
    pub source: libloading::Error,
}

unsafe fn symbol<T: Copy>(lib: &Library, name: &'static str) -> Result<T, MissingSymbol> {
    let sym = lib
        .get::<T>(name.as_bytes())
        .map_err(|source| MissingSymbol { name, source })?;
    Ok(*sym)
}

macro_rules! sass_api {
    ($(fn $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?;)*) => {
        /// Function pointers resolved from an open libsass.
        ///
        /// The pointers are only valid while the [`Library`] they were read
        /// from stays loaded.
        #[derive(Debug, Clone, Copy)]
        pub struct SassApi {
            $(pub $name: unsafe extern "C" fn($($ty),*) $(-> $ret)?,)*
        }

        impl SassApi {
            /// Resolve every symbol from `lib`.
            ///
            /// # Safety
            /// `lib` must be libsass 3.5 or newer; the signatures are not checked.
            pub unsafe fn load(lib: &Library) -> Result<Self, MissingSymbol> {
                Ok(Self {
                    $($name: symbol(lib, stringify!($name))?,)*
                })
            }
        }
    };
}

sass_api! {
    fn libsass_version() -> *const c_char;
    fn sass_copy_c_string(input: *const c_char) -> *mut c_char;
    fn sass_free_memory(ptr: *mut c_void);

    fn sass_make_data_context(source: *mut c_char) -> *mut Sass_Data_Context;
    fn sass_make_file_context(input_path: *const c_char) -> *mut Sass_File_Context;
    fn sass_data_context_get_context(ctx: *mut Sass_Data_Context) -> *mut Sass_Context;
    fn sass_file_context_get_context(ctx: *mut Sass_File_Context) -> *mut Sass_Context;
    fn sass_context_get_options(ctx: *mut Sass_Context) -> *mut Sass_Options;

    fn sass_option_set_output_style(options: *mut Sass_Options, style: Sass_Output_Style);
    fn sass_option_set_source_comments(options: *mut Sass_Options, enabled: bool);
    fn sass_option_set_precision(options: *mut Sass_Options, precision: c_int);
    fn sass_option_push_include_path(options: *mut Sass_Options, path: *const c_char);

    fn sass_compile_data_context(ctx: *mut Sass_Data_Context) -> c_int;
    fn sass_compile_file_context(ctx: *mut Sass_File_Context) -> c_int;

    fn sass_context_get_error_status(ctx: *mut Sass_Context) -> c_int;
    fn sass_context_get_error_message(ctx: *mut Sass_Context) -> *const c_char;
    fn sass_context_get_output_string(ctx: *mut Sass_Context) -> *const c_char;

    fn sass_delete_data_context(ctx: *mut Sass_Data_Context);
    fn sass_delete_file_context(ctx: *mut Sass_File_Context);
}
