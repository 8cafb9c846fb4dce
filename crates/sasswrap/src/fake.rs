//! In-process stand-in for libsass, used by unit tests.
//!
//! Every fake context and every string handed out by the fake
//! `sass_copy_c_string` is counted per thread, so tests can check that a
//! compile call released everything it allocated.
//!
//! Output is a header naming the applied options followed by the input
//! unchanged. Sources containing `@error` fail with [`ERROR_MESSAGE`].

use std::cell::Cell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;

use sasswrap_sys::{
    Sass_Context, Sass_Data_Context, Sass_File_Context, Sass_Options, Sass_Output_Style, SassApi,
};

use crate::OutputStyle;

pub const ERROR_MESSAGE: &str = "Error: boom\n        on line 1:5 of stdin\n>> a { @error boom; }\n   ----^\n";

thread_local! {
    static CONTEXTS: Cell<isize> = const { Cell::new(0) };
    static STRINGS: Cell<isize> = const { Cell::new(0) };
}

/// Fake contexts created and not yet deleted on this thread.
pub fn live_contexts() -> isize {
    CONTEXTS.with(Cell::get)
}

/// Fake string copies handed out and not yet freed on this thread.
pub fn live_strings() -> isize {
    STRINGS.with(Cell::get)
}

fn bump(counter: &'static std::thread::LocalKey<Cell<isize>>, delta: isize) {
    counter.with(|c| c.set(c.get() + delta));
}

#[derive(Default)]
struct FakeContext {
    source: Option<CString>,
    input_path: Option<CString>,
    style: Sass_Output_Style,
    comments: bool,
    precision: Option<c_int>,
    include: Vec<String>,
    status: c_int,
    output: Option<CString>,
    error: Option<CString>,
}

impl FakeContext {
    fn render(&mut self, body: &str) {
        let style = OutputStyle::ALL
            .into_iter()
            .find(|s| s.native_code() == self.style)
            .map_or("unknown", OutputStyle::name);
        let mut tags = vec![style.to_string()];
        if self.comments {
            tags.push("comments".into());
        }
        if let Some(p) = self.precision {
            tags.push(format!("precision={p}"));
        }
        if !self.include.is_empty() {
            tags.push(format!("include={}", self.include.join(",")));
        }
        let css = format!("/* {} */\n{body}", tags.join(" "));
        self.output = Some(CString::new(css).unwrap());
    }

    fn fail(&mut self, message: &str) {
        self.status = 1;
        self.error = Some(CString::new(message).unwrap());
    }
}

unsafe fn fake<'a, T>(ptr: *mut T) -> &'a mut FakeContext {
    &mut *ptr.cast::<FakeContext>()
}

unsafe extern "C" fn libsass_version() -> *const c_char {
    c"3.6.6-fake".as_ptr()
}

unsafe extern "C" fn sass_copy_c_string(input: *const c_char) -> *mut c_char {
    bump(&STRINGS, 1);
    CStr::from_ptr(input).to_owned().into_raw()
}

unsafe extern "C" fn sass_free_memory(ptr: *mut c_void) {
    bump(&STRINGS, -1);
    drop(CString::from_raw(ptr.cast()));
}

unsafe extern "C" fn sass_make_data_context(source: *mut c_char) -> *mut Sass_Data_Context {
    bump(&CONTEXTS, 1);
    let ctx = FakeContext {
        source: Some(CString::from_raw(source)),
        ..FakeContext::default()
    };
    Box::into_raw(Box::new(ctx)).cast()
}

unsafe extern "C" fn sass_make_file_context(input_path: *const c_char) -> *mut Sass_File_Context {
    bump(&CONTEXTS, 1);
    let ctx = FakeContext {
        input_path: Some(CStr::from_ptr(input_path).to_owned()),
        ..FakeContext::default()
    };
    Box::into_raw(Box::new(ctx)).cast()
}

unsafe extern "C" fn null_data_context(_source: *mut c_char) -> *mut Sass_Data_Context {
    ptr::null_mut()
}

unsafe extern "C" fn null_file_context(_input_path: *const c_char) -> *mut Sass_File_Context {
    ptr::null_mut()
}

unsafe extern "C" fn sass_data_context_get_context(ctx: *mut Sass_Data_Context) -> *mut Sass_Context {
    ctx.cast()
}

unsafe extern "C" fn sass_file_context_get_context(ctx: *mut Sass_File_Context) -> *mut Sass_Context {
    ctx.cast()
}

unsafe extern "C" fn sass_context_get_options(ctx: *mut Sass_Context) -> *mut Sass_Options {
    ctx.cast()
}

unsafe extern "C" fn sass_option_set_output_style(options: *mut Sass_Options, style: Sass_Output_Style) {
    fake(options).style = style;
}

unsafe extern "C" fn sass_option_set_source_comments(options: *mut Sass_Options, enabled: bool) {
    fake(options).comments = enabled;
}

unsafe extern "C" fn sass_option_set_precision(options: *mut Sass_Options, precision: c_int) {
    fake(options).precision = Some(precision);
}

unsafe extern "C" fn sass_option_push_include_path(options: *mut Sass_Options, path: *const c_char) {
    let path = CStr::from_ptr(path).to_string_lossy().into_owned();
    fake(options).include.push(path);
}

unsafe extern "C" fn sass_compile_data_context(ctx: *mut Sass_Data_Context) -> c_int {
    let ctx = fake(ctx);
    let source = ctx
        .source
        .as_ref()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if source.contains("@error") {
        ctx.fail(ERROR_MESSAGE);
    } else {
        ctx.render(&source);
    }
    ctx.status
}

unsafe extern "C" fn sass_compile_file_context(ctx: *mut Sass_File_Context) -> c_int {
    let ctx = fake(ctx);
    let path = ctx
        .input_path
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    match std::fs::read_to_string(&path) {
        Ok(source) if source.contains("@error") => ctx.fail(ERROR_MESSAGE),
        Ok(source) => ctx.render(&source),
        Err(_) => ctx.fail(&format!("File to read not found or unreadable: {path}")),
    }
    ctx.status
}

unsafe extern "C" fn sass_context_get_error_status(ctx: *mut Sass_Context) -> c_int {
    fake(ctx).status
}

unsafe extern "C" fn sass_context_get_error_message(ctx: *mut Sass_Context) -> *const c_char {
    fake(ctx).error.as_ref().map_or(ptr::null(), |e| e.as_ptr())
}

unsafe extern "C" fn sass_context_get_output_string(ctx: *mut Sass_Context) -> *const c_char {
    fake(ctx).output.as_ref().map_or(ptr::null(), |o| o.as_ptr())
}

unsafe extern "C" fn sass_delete_data_context(ctx: *mut Sass_Data_Context) {
    bump(&CONTEXTS, -1);
    let ctx = Box::from_raw(ctx.cast::<FakeContext>());
    if ctx.source.is_some() {
        bump(&STRINGS, -1);
    }
}

unsafe extern "C" fn sass_delete_file_context(ctx: *mut Sass_File_Context) {
    bump(&CONTEXTS, -1);
    drop(Box::from_raw(ctx.cast::<FakeContext>()));
}

/// A symbol table backed by the fake compiler.
pub fn api() -> SassApi {
    SassApi {
        libsass_version,
        sass_copy_c_string,
        sass_free_memory,
        sass_make_data_context,
        sass_make_file_context,
        sass_data_context_get_context,
        sass_file_context_get_context,
        sass_context_get_options,
        sass_option_set_output_style,
        sass_option_set_source_comments,
        sass_option_set_precision,
        sass_option_push_include_path,
        sass_compile_data_context,
        sass_compile_file_context,
        sass_context_get_error_status,
        sass_context_get_error_message,
        sass_context_get_output_string,
        sass_delete_data_context,
        sass_delete_file_context,
    }
}

/// Like [`api`], but every context constructor returns NULL.
pub fn api_without_contexts() -> SassApi {
    SassApi {
        sass_make_data_context: null_data_context,
        sass_make_file_context: null_file_context,
        ..api()
    }
}
