use std::fmt;

use crate::code::Code;
use crate::data::Data;
use crate::{BoxError, Error};

// ── ResultExt: wrapping on Results ────────────────────────────────

/// Extension trait for wrapping the error of any `Result` in an [`Error`].
///
/// Follows the same capture rule as [`Error::wrap`]: the stack is recorded
/// at the extension call when the error being wrapped is foreign, and left
/// empty when it already is an `Error<C>`.
///
/// ```
/// use coderr::{data, Error, ResultExt};
///
/// fn read_config() -> Result<String, Error> {
///     std::fs::read_to_string("/definitely/not/here.toml")
///         .wrap_err_with("config/read", [data! { "path" => "/definitely/not/here.toml" }])
/// }
///
/// let err = read_config().unwrap_err();
/// assert_eq!(err.code(), &"config/read");
/// assert!(err.cause().is_some());
/// ```
pub trait ResultExt<T> {
    /// Wrap the error with a code and no data.
    fn wrap_err<C>(self, code: impl Into<Code<C>>) -> Result<T, Error<C>>
    where
        C: fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Wrap the error with a code and data fragments.
    fn wrap_err_with<C, I>(self, code: impl Into<Code<C>>, fragments: I) -> Result<T, Error<C>>
    where
        C: fmt::Debug + fmt::Display + Send + Sync + 'static,
        I: IntoIterator<Item = Data>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[inline(never)]
    fn wrap_err<C>(self, code: impl Into<Code<C>>) -> Result<T, Error<C>>
    where
        C: fmt::Debug + fmt::Display + Send + Sync + 'static,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::wrap_at(e.into(), code.into(), Data::new(), 1)),
        }
    }

    #[inline(never)]
    fn wrap_err_with<C, I>(self, code: impl Into<Code<C>>, fragments: I) -> Result<T, Error<C>>
    where
        C: fmt::Debug + fmt::Display + Send + Sync + 'static,
        I: IntoIterator<Item = Data>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::wrap_at(e.into(), code.into(), Data::merged(fragments), 1)),
        }
    }
}
