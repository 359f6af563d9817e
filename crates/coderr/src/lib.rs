//! # coderr: Coded Errors
//!
//! A structured error crate: every error carries an opaque classification
//! code, string-keyed diagnostic data and an optional cause, and the error
//! at the bottom of a chain records where it was raised.
//!
//! ## Design
//!
//! `Error<C>` is built once and never mutated:
//!
//! - **Root** (`Error::new`): captures the caller's stack.
//! - **Wrapper** (`Error::wrap`): holds a cause. Captures only when the
//!   cause is foreign; wrapping another `Error<C>` skips the stack walk
//!   because the origin below already has one.
//!
//! Capture stores raw return addresses only. Symbol lookup happens in
//! [`Error::frames`], so errors that are never inspected stay cheap.
//!
//! ## Quick Start
//!
//! ```rust
//! use coderr::{data, Error, ResultExt};
//!
//! fn open_db(path: &str) -> Result<(), Error> {
//!     Err(Error::new("db/open", [data! { "path" => path }]))
//! }
//!
//! fn load_user(id: u64) -> Result<(), Error> {
//!     open_db("/var/lib/app.db").wrap_err_with("user/load", [data! { "id" => id }])
//! }
//!
//! let err = load_user(7).unwrap_err();
//! assert_eq!(err.code(), &"user/load");
//! assert!(err.frames().is_empty());          // wrapper: no capture
//!
//! let origin = err.origin().unwrap();
//! assert_eq!(origin.code(), &"db/open");
//! assert!(!origin.frames().is_empty());      // frame 0 is inside open_db
//! ```
//!
//! ## Classifying foreign errors
//!
//! [`code`] works on any `dyn Error`. Errors that are not `Error<C>` report
//! [`Code::Unset`], the same sentinel used when no code was given:
//!
//! ```rust
//! use coderr::{code, Code};
//!
//! let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! assert_eq!(code::<&str>(Some(&io)), Some(Code::Unset));
//! assert_eq!(code::<&str>(None), None);
//! ```
//!
//! ## Feature Flags
//!
//! | Flag      | Effect |
//! |-----------|--------|
//! | `capture` | (default) Walks the stack at chain origins via `backtrace` |
//!
//! ## Environment
//!
//! | Variable           | Effect |
//! |--------------------|--------|
//! | `CODERR_BACKTRACE` | `0`/`off` disables capture at runtime |
//! | `CODERR_DEPTH`     | Frame ceiling per origin, `1..=32` |

use std::error::Error as StdError;
use std::fmt;

mod capture;
mod code;
pub mod config;
mod convert;
mod data;
mod error;
mod frame;
mod macros;

// ── Public API ────────────────────────────────────────────────────

pub use capture::MAX_DEPTH;
pub use code::Code;
pub use config::{CaptureConfig, ConfigError};
pub use convert::ResultExt;
pub use data::{Data, Value};
pub use error::{Chain, Error};
pub use frame::{Frame, UNKNOWN};

/// Type-erased error used for causes.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Convenience Result alias.
pub type CResult<T, C = &'static str> = Result<T, Error<C>>;

/// Classify any error.
///
/// - `None` → `None`
/// - an `Error<C>` → its code (possibly `Code::Unset`)
/// - anything else → `Code::Unset`
///
/// Takes the same shape as [`StdError::source`], so a chain can be
/// classified layer by layer:
///
/// ```rust
/// use coderr::{code, Error};
///
/// let err = Error::wrap(Error::new("inner", []), "outer", []);
/// assert_eq!(code::<&str>(Some(&err)).and_then(|c| c.into_inner()), Some(&"outer"));
/// assert_eq!(code::<&str>(std::error::Error::source(&err)).and_then(|c| c.into_inner()), Some(&"inner"));
/// ```
pub fn code<'a, C>(err: Option<&'a (dyn StdError + 'static)>) -> Option<Code<&'a C>>
where
    C: fmt::Debug + fmt::Display + 'static,
{
    let err = err?;
    Some(match err.downcast_ref::<Error<C>>() {
        Some(e) => e.code().as_ref(),
        None => Code::Unset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn code_of_library_error() {
        let err = Error::new("msg/code", [data! { "key" => "val" }]);
        assert_eq!(code::<&str>(Some(&err)), Some(Code::Set(&"msg/code")));
    }

    #[test]
    fn code_of_uncoded_library_error() {
        let err: Error = Error::new(Code::Unset, []);
        assert_eq!(code::<&str>(Some(&err)), Some(Code::Unset));
    }

    #[test]
    fn code_of_foreign_error_is_sentinel() {
        let err = io::Error::new(io::ErrorKind::Other, "err");
        let c = code::<&str>(Some(&err));
        assert!(c.is_some());
        assert_eq!(c, Some(Code::Unset));
    }

    #[test]
    fn code_of_nothing_is_none() {
        assert_eq!(code::<&str>(None), None);
    }

    #[test]
    fn code_of_other_code_type_is_sentinel() {
        let err = Error::new(42u32, []);
        assert_eq!(code::<&str>(Some(&err)), Some(Code::Unset));
        assert_eq!(code::<u32>(Some(&err)), Some(Code::Set(&42)));
    }

    #[test]
    fn code_along_chain() {
        let io = io::Error::new(io::ErrorKind::Other, "disk");
        let err = Error::wrap(Error::wrap(io, "A", []), "B", []);

        let codes: Vec<Option<Code<&&str>>> = err.chain().map(|e| code::<&str>(Some(e))).collect();
        assert_eq!(
            codes,
            [Some(Code::Set(&"B")), Some(Code::Set(&"A")), Some(Code::Unset)]
        );
    }

    #[test]
    fn result_alias() {
        fn f() -> CResult<()> {
            Err(Error::new("alias", []))
        }
        assert!(f().is_err());
    }
}
