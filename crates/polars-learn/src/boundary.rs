//! Turns failures into error strings at the `extern "C"` surface.
//!
//! Nothing may unwind into the caller's runtime. Every exported function runs
//! its body through [`translate_error`], which clears the caller's error slot,
//! runs the body, and on failure writes `"<message> (in <function>)"` to the
//! slot and returns a [`FallbackValue`].
use std::cell::RefCell;
use std::ffi::{c_char, CString};
use std::fmt::Debug;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use crate::config::{error_detail_limit, truncate_detail, verbose};
use crate::error::LearnResult;

thread_local! {
    static ERROR_MESSAGE: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Message reported for panics, whose payload is not an error we know.
pub const UNKNOWN_EXCEPTION: &str = "unknown exception";

/// The caller-owned `const char **outError` of a boundary call.
///
/// The string written on failure is owned by the calling thread and stays
/// valid until the next boundary call on that thread.
#[derive(Debug)]
pub struct ErrorSlot(*mut *const c_char);

impl ErrorSlot {
    /// # Safety
    /// `out_error` must be null or valid for writing a pointer.
    pub unsafe fn from_raw(out_error: *mut *const c_char) -> Self {
        Self(out_error)
    }

    pub fn clear(&self) {
        if !self.0.is_null() {
            unsafe { self.0.write(ptr::null()) };
        }
    }

    /// Store `"<msg> (in <function>)"` and point the slot at it.
    pub fn set(&self, msg: &str, function: &str) {
        let msg = truncate_detail(msg, error_detail_limit());
        let full = format!("{msg} (in {function})").replace('\0', "\\0");
        let c_msg = CString::new(full).unwrap_or_default();
        let msg_ptr = c_msg.as_ptr();
        ERROR_MESSAGE.with_borrow_mut(|slot| *slot = Some(c_msg));
        if !self.0.is_null() {
            unsafe { self.0.write(msg_ptr) };
        }
    }
}

/// Value returned by a boundary call that failed.
pub trait FallbackValue {
    fn fallback() -> Self;
}

macro_rules! impl_fallback_zero {
    ($($t:ty),*) => {
        $(impl FallbackValue for $t {
            fn fallback() -> Self {
                Self::default()
            }
        })*
    };
}

impl_fallback_zero!((), bool, f32, f64, i32, i64, u32, u64, usize);

impl<T> FallbackValue for *const T {
    fn fallback() -> Self {
        ptr::null()
    }
}

impl<T> FallbackValue for *mut T {
    fn fallback() -> Self {
        ptr::null_mut()
    }
}

/// Run `f` as the body of the boundary call `function`.
///
/// Errors and panics never leave this function. Either `f` succeeds, the slot
/// is cleared and its value returned, or the slot holds a message and
/// `T::fallback()` is returned.
pub fn translate_error<T, F>(function: &str, out_error: &ErrorSlot, f: F) -> T
where
    T: FallbackValue + Debug,
    F: FnOnce() -> LearnResult<T>,
{
    out_error.clear();

    let msg = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(out)) => {
            if verbose() {
                eprintln!("{function}: returning {out:?}");
            }
            return out;
        },
        Ok(Err(err)) => err.to_string(),
        Err(_) => UNKNOWN_EXCEPTION.to_string(),
    };

    if verbose() {
        eprintln!("{function}: failed with {msg}");
    }
    // If we panic while setting the error message, just abort.
    if catch_unwind(AssertUnwindSafe(|| out_error.set(&msg, function))).is_err() {
        std::process::abort();
    }
    T::fallback()
}
