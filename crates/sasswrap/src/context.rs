//! Scoped libsass contexts.
//!
//! A guard owns exactly one native context and deletes it on drop. Results
//! are copied out of the context through `&self`, so nothing borrowed from
//! native memory can outlive the guard.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr::NonNull;

use sasswrap_sys::{Sass_Context, Sass_Data_Context, Sass_File_Context, SassApi};

use crate::{CompileOptions, CompileResult, Error};

const MISSING_MESSAGE: &str = "libsass reported an error without a message";

/// Operations shared by data and file contexts.
pub(crate) trait NativeContext {
    fn api(&self) -> &SassApi;

    /// The `Sass_Context` base of this context.
    fn base(&self) -> NonNull<Sass_Context>;

    /// Run the compiler. Returns the raw status code.
    fn run(&mut self) -> c_int;

    /// Copy `options` into the context's native options.
    ///
    /// Include paths are converted to strings this call owns; libsass copies
    /// them, and they are dropped before this returns.
    fn apply(&mut self, options: &CompileOptions) -> Result<(), Error> {
        let api = *self.api();
        let native = unsafe { (api.sass_context_get_options)(self.base().as_ptr()) };
        if native.is_null() {
            return Err(Error::Allocation { what: "options" });
        }

        unsafe {
            (api.sass_option_set_output_style)(native, options.style().native_code());
            (api.sass_option_set_source_comments)(native, options.source_comments());
            if let Some(precision) = options.precision() {
                (api.sass_option_set_precision)(native, c_int::from(precision));
            }
        }

        for dir in options.include_paths() {
            let dir = path_to_cstring(dir)?;
            unsafe { (api.sass_option_push_include_path)(native, dir.as_ptr()) };
        }

        if let Some(image_path) = options.image_path() {
            log::warn!(
                "image path {} ignored: libsass 3 has no image path option",
                image_path.display()
            );
        }

        Ok(())
    }

    /// Read the status flag and copy the output or error message out.
    fn take_result(&self) -> CompileResult<String> {
        let api = self.api();
        let base = self.base().as_ptr();
        let status = unsafe { (api.sass_context_get_error_status)(base) };

        if status != 0 {
            let message = unsafe { copy_out((api.sass_context_get_error_message)(base)) };
            log::debug!("libsass status {status}");
            return Err(Error::Compile {
                message: message.unwrap_or_else(|| MISSING_MESSAGE.into()),
            });
        }

        let output = unsafe { copy_out((api.sass_context_get_output_string)(base)) };
        Ok(output.unwrap_or_default())
    }

    /// Apply options, compile, and copy the result out.
    fn compile(mut self, options: &CompileOptions) -> CompileResult<String>
    where
        Self: Sized,
    {
        self.apply(options)?;
        self.run();
        self.take_result()
    }
}

/// Copy a NUL-terminated native string into an owned `String`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn copy_out(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

pub(crate) fn path_to_cstring(path: &Path) -> Result<CString, Error> {
    let s = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
    })?;
    CString::new(s).map_err(|_| Error::InteriorNul { what: "path" })
}

/// Context for compiling in-memory source.
pub(crate) struct DataContext<'a> {
    api: &'a SassApi,
    raw: NonNull<Sass_Data_Context>,
}

impl<'a> DataContext<'a> {
    pub fn new(api: &'a SassApi, source: &str) -> Result<Self, Error> {
        let source = CString::new(source).map_err(|_| Error::InteriorNul { what: "source" })?;

        // The data context takes this copy over and frees it on delete.
        let copy = unsafe { (api.sass_copy_c_string)(source.as_ptr()) };
        if copy.is_null() {
            return Err(Error::Allocation { what: "source copy" });
        }

        let raw = unsafe { (api.sass_make_data_context)(copy) };
        match NonNull::new(raw) {
            Some(raw) => {
                log::trace!("data context {raw:p} created");
                Ok(Self { api, raw })
            }
            None => {
                unsafe { (api.sass_free_memory)(copy.cast()) };
                Err(Error::Allocation {
                    what: "data context",
                })
            }
        }
    }
}

impl NativeContext for DataContext<'_> {
    fn api(&self) -> &SassApi {
        self.api
    }

    fn base(&self) -> NonNull<Sass_Context> {
        // libsass upcasts in place; the fallback is the same address.
        let base = unsafe { (self.api.sass_data_context_get_context)(self.raw.as_ptr()) };
        NonNull::new(base).unwrap_or(self.raw.cast())
    }

    fn run(&mut self) -> c_int {
        unsafe { (self.api.sass_compile_data_context)(self.raw.as_ptr()) }
    }
}

impl Drop for DataContext<'_> {
    fn drop(&mut self) {
        log::trace!("data context {:p} deleted", self.raw);
        unsafe { (self.api.sass_delete_data_context)(self.raw.as_ptr()) };
    }
}

/// Context for compiling a file on disk.
pub(crate) struct FileContext<'a> {
    api: &'a SassApi,
    raw: NonNull<Sass_File_Context>,
}

impl<'a> FileContext<'a> {
    pub fn new(api: &'a SassApi, path: &Path) -> Result<Self, Error> {
        let input = path_to_cstring(path)?;
        let raw = unsafe { (api.sass_make_file_context)(input.as_ptr()) };
        let raw = NonNull::new(raw).ok_or(Error::Allocation {
            what: "file context",
        })?;
        log::trace!("file context {raw:p} created for {}", path.display());
        Ok(Self { api, raw })
    }
}

impl NativeContext for FileContext<'_> {
    fn api(&self) -> &SassApi {
        self.api
    }

    fn base(&self) -> NonNull<Sass_Context> {
        let base = unsafe { (self.api.sass_file_context_get_context)(self.raw.as_ptr()) };
        NonNull::new(base).unwrap_or(self.raw.cast())
    }

    fn run(&mut self) -> c_int {
        unsafe { (self.api.sass_compile_file_context)(self.raw.as_ptr()) }
    }
}

impl Drop for FileContext<'_> {
    fn drop(&mut self) {
        log::trace!("file context {:p} deleted", self.raw);
        unsafe { (self.api.sass_delete_file_context)(self.raw.as_ptr()) };
    }
}
