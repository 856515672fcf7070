//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Results cross the boundary as one `FfiResult` per call, handed to the
//! caller's callback. Every pointer inside it is borrowed for the duration
//! of that callback only; the C side copies what it wants to keep and never
//! frees anything. The owned side of each pointer lives in an `Outcome` on
//! the Rust stack until the callback returns.
//!
//! `Reply` carries the callback and its `user_data` into the async task and
//! guarantees exactly one delivery: `send` consumes it, and dropping it
//! unsent (a panic, or a runtime shutting down under the task) reports an
//! internal error instead.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use serde::Serialize;
use tracing::warn;
use xsolla_core::{ApiError, ApiResult, ErrorKind};

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Receives the single result of an asynchronous call.
pub type FfiCallback = extern "C" fn(user_data: *mut c_void, result: *const FfiResult);

/// Asked to show `url` to the user and report the redirect that lands on
/// `callback_url` through `xsolla_social_auth_complete`.
pub type FfiOpenUrl =
    extern "C" fn(user_data: *mut c_void, url: *const c_char, callback_url: *const c_char);

/// Opaque host pointer handed back verbatim.
///
/// The host promises the pointee may be used from any thread; that is the
/// contract of every `user_data` argument in this library.
#[derive(Clone, Copy)]
pub(crate) struct UserData(pub(crate) *mut c_void);

unsafe impl Send for UserData {}
unsafe impl Sync for UserData {}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error category of an `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    /// Not initialized, initialized twice, or the subsystem is not configured.
    Config = 1,
    /// The server answered with an error envelope.
    Client = 2,
    /// The server answered with an error but no readable envelope.
    ClientUnknown = 3,
    /// No response arrived.
    Transport = 4,
    /// Social sign-in was cancelled or timed out.
    Social = 5,
    /// A missing or malformed argument, or an unreadable response body.
    InvalidArgument = 6,
    /// The call ended without a result (a panic inside the library).
    Internal = 7,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Config => FfiErrorCode::Config,
            ErrorKind::Client => FfiErrorCode::Client,
            ErrorKind::ClientUnknown => FfiErrorCode::ClientUnknown,
            ErrorKind::Transport => FfiErrorCode::Transport,
            ErrorKind::Social => FfiErrorCode::Social,
            ErrorKind::Invalid => FfiErrorCode::InvalidArgument,
        }
    }
}

/// Result of one call.
///
/// On success `error_code` is `Ok`, `error_message` is null and `payload`
/// is the JSON form of the result (`null` for calls without one).
/// On failure `error_message` is the human-readable message, `http_status`
/// the status of the rejected response (0 when none arrived) and `payload`
/// is null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *const c_char,
    pub http_status: u16,
    pub payload: *const c_char,
}

/// Owned counterpart of `FfiResult`.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub(crate) error_code: FfiErrorCode,
    pub(crate) message: Option<CString>,
    pub(crate) http_status: u16,
    pub(crate) payload: Option<CString>,
}

impl Outcome {
    pub(crate) fn from_result<T: Serialize>(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => match serde_json::to_string(&value) {
                Ok(json) => Outcome {
                    error_code: FfiErrorCode::Ok,
                    message: None,
                    http_status: 0,
                    payload: Some(c_string(json)),
                },
                Err(e) => Self::from_error(&ApiError::Serialization(e.to_string())),
            },
            Err(e) => Self::from_error(&e),
        }
    }

    pub(crate) fn from_error(err: &ApiError) -> Self {
        Outcome {
            error_code: err.kind().into(),
            message: Some(c_string(err.to_string())),
            http_status: err.status().unwrap_or(0),
            payload: None,
        }
    }

    pub(crate) fn internal(msg: &str) -> Self {
        Outcome {
            error_code: FfiErrorCode::Internal,
            message: Some(c_string(msg.to_string())),
            http_status: 0,
            payload: None,
        }
    }

    /// Borrowed view, valid while `self` is alive.
    pub(crate) fn as_ffi(&self) -> FfiResult {
        FfiResult {
            error_code: self.error_code,
            error_message: self.message.as_ref().map_or(std::ptr::null(), |m| m.as_ptr()),
            http_status: self.http_status,
            payload: self.payload.as_ref().map_or(std::ptr::null(), |p| p.as_ptr()),
        }
    }
}

/// `CString` from text that may contain interior NULs; they are dropped.
pub(crate) fn c_string(text: String) -> CString {
    CString::new(text)
        .unwrap_or_else(|e| {
            let mut bytes = e.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default()
        })
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Callback plus `user_data`, delivered exactly once.
pub(crate) struct Reply {
    callback: FfiCallback,
    user_data: UserData,
    sent: bool,
}

impl Reply {
    pub(crate) fn new(callback: FfiCallback, user_data: *mut c_void) -> Self {
        Reply {
            callback,
            user_data: UserData(user_data),
            sent: false,
        }
    }

    pub(crate) fn send(mut self, outcome: Outcome) {
        self.sent = true;
        self.deliver(&outcome);
    }

    fn deliver(&self, outcome: &Outcome) {
        let result = outcome.as_ffi();
        (self.callback)(self.user_data.0, &result);
    }
}

impl Drop for Reply {
    fn drop(&mut self) {
        if !self.sent {
            warn!("call ended without a result");
            self.deliver(&Outcome::internal("call ended without a result"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use xsolla_core::error::SERVER_IS_NOT_RESPONDING;
    use xsolla_core::{TransportError, TransportErrorKind};

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn count(user_data: *mut c_void, result: *const FfiResult) {
        CALLS.fetch_add(1, Ordering::SeqCst);
        let seen = unsafe { &mut *(user_data as *mut Option<FfiErrorCode>) };
        *seen = Some(unsafe { &*result }.error_code);
    }

    #[test]
    fn success_carries_json_payload() {
        let outcome = Outcome::from_result(Ok(vec!["sword", "shield"]));
        let ffi = outcome.as_ffi();
        assert_eq!(ffi.error_code, FfiErrorCode::Ok);
        assert!(ffi.error_message.is_null());
        let payload = unsafe { CStr::from_ptr(ffi.payload) }.to_str().unwrap();
        assert_eq!(payload, r#"["sword","shield"]"#);
    }

    #[test]
    fn unit_success_is_json_null() {
        let outcome = Outcome::from_result(Ok(()));
        let payload = unsafe { CStr::from_ptr(outcome.as_ffi().payload) };
        assert_eq!(payload.to_str().unwrap(), "null");
    }

    #[test]
    fn errors_keep_message_and_status() {
        let outcome = Outcome::from_error(&ApiError::Client {
            status: 404,
            code: None,
            description: "not found".to_string(),
        });
        let ffi = outcome.as_ffi();
        assert_eq!(ffi.error_code, FfiErrorCode::Client);
        assert_eq!(ffi.http_status, 404);
        assert!(ffi.payload.is_null());
        let msg = unsafe { CStr::from_ptr(ffi.error_message) }.to_str().unwrap();
        assert_eq!(msg, "not found");

        let outcome = Outcome::from_error(&ApiError::Transport(TransportError::new(
            TransportErrorKind::Connect,
            "refused",
        )));
        assert_eq!(outcome.error_code, FfiErrorCode::Transport);
        assert_eq!(outcome.http_status, 0);
        assert_eq!(
            outcome.message.as_deref().unwrap().to_str().unwrap(),
            SERVER_IS_NOT_RESPONDING
        );
    }

    #[test]
    fn interior_nul_is_stripped() {
        assert_eq!(c_string("a\0b".to_string()).to_str().unwrap(), "ab");
    }

    #[test]
    fn reply_fires_once_when_sent_and_once_when_dropped() {
        let before = CALLS.load(Ordering::SeqCst);

        let mut seen: Option<FfiErrorCode> = None;
        let reply = Reply::new(count, &mut seen as *mut _ as *mut c_void);
        reply.send(Outcome::from_result(Ok(1)));
        assert_eq!(seen, Some(FfiErrorCode::Ok));

        let mut dropped: Option<FfiErrorCode> = None;
        drop(Reply::new(count, &mut dropped as *mut _ as *mut c_void));
        assert_eq!(dropped, Some(FfiErrorCode::Internal));

        assert_eq!(CALLS.load(Ordering::SeqCst) - before, 2);
    }
}
