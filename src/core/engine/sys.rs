// Raw boundary contract of the dynamically loaded translation module.
use std::os::raw::{c_char, c_int, c_void};

pub const SYM_CREATE: &[u8] = b"create_metal_translate";
pub const SYM_TRANSLATE: &[u8] = b"translate";
pub const SYM_RELEASE: &[u8] = b"free_metal_translate";
pub const SYM_FREE_RESULT: &[u8] = b"free_translated_string";

pub type CreatePathFn = unsafe extern "C" fn(*const c_char) -> *mut c_void;

pub type CreatePathVariantFn = unsafe extern "C" fn(*const c_char, c_int) -> *mut c_void;

pub type CreatePathVariantTokensFn =
    unsafe extern "C" fn(*const c_char, c_int, c_int) -> *mut c_void;

pub type TranslateFn = unsafe extern "C" fn(
    *mut c_void,
    *const c_char,
    *const c_char,
    *const c_char,
) -> *mut c_char;

pub type ReleaseFn = unsafe extern "C" fn(*mut c_void);

pub type FreeResultFn = unsafe extern "C" fn(*mut c_char);
