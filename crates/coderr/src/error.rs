use std::error::Error as StdError;
use std::fmt;

use crate::capture;
use crate::config;
use crate::code::Code;
use crate::data::Data;
use crate::frame::{Callers, Frame};
use crate::BoxError;

/// A coded error with diagnostic data, an optional cause and the stack
/// trace of the point where its chain began.
///
/// Built once through [`Error::new`] or [`Error::wrap`] and never mutated
/// afterwards; all accessors hand out borrows.
///
/// # Stack capture
///
/// Only the origin of a chain pays for a stack walk:
///
/// - `new` always captures, a root error has no earlier origin.
/// - `wrap` captures only when the cause is foreign. Wrapping another
///   `Error<C>` leaves the wrapper's frames empty, since the cause's own
///   origin already points at where things went wrong.
///
/// Captured addresses are symbolized on each [`frames`](Error::frames) call.
///
/// # Code type
///
/// `C` is opaque to the library. An application normally picks one code
/// type for all of its errors; `wrap` and [`crate::code`] recognise only
/// `Error<C>` of that same `C` as library errors.
pub struct Error<C = &'static str> {
    code: Code<C>,
    data: Data,
    cause: Option<BoxError>,
    callers: Callers,
}

// ── Constructors ──────────────────────────────────────────────────

impl<C> Error<C>
where
    C: fmt::Debug + fmt::Display + Send + Sync + 'static,
{
    /// Create a root error and capture the caller's stack.
    ///
    /// `fragments` are merged left to right; on a key collision the later
    /// fragment wins. Pass `Code::Unset` to build an error without a code.
    ///
    /// ```
    /// use coderr::{data, Error};
    ///
    /// let err = Error::new("config/missing", [data! { "path" => "/etc/app.toml" }]);
    /// assert_eq!(err.code(), &"config/missing");
    /// assert_eq!(err.to_string(), r#"config/missing, data: {"path": "/etc/app.toml"}"#);
    /// ```
    #[inline(never)]
    pub fn new<I>(code: impl Into<Code<C>>, fragments: I) -> Self
    where
        I: IntoIterator<Item = Data>,
    {
        let callers = capture::callers(1, config::global());
        Self::assemble(code.into(), Data::merged(fragments), None, callers)
    }

    /// Wrap `cause` in a new error.
    ///
    /// `cause` may be any error (or a `String`/`&str` message). When it is an
    /// `Error<C>` no stack is captured for the wrapper; otherwise the
    /// caller's stack is captured here, this being the first point at which
    /// the chain's origin can be recorded.
    ///
    /// ```
    /// use coderr::{data, Error};
    ///
    /// let root = Error::new("db/timeout", []);
    /// let wrapped = Error::wrap(root, "user/load", [data! { "id" => 42 }]);
    /// assert!(wrapped.frames().is_empty());
    /// ```
    #[inline(never)]
    pub fn wrap<I>(cause: impl Into<BoxError>, code: impl Into<Code<C>>, fragments: I) -> Self
    where
        I: IntoIterator<Item = Data>,
    {
        Self::wrap_at(cause.into(), code.into(), Data::merged(fragments), 1)
    }

    /// Every wrapping path ends here. `skip` counts the library frames
    /// between this function and user code, not including this one.
    #[inline(never)]
    pub(crate) fn wrap_at(cause: BoxError, code: Code<C>, data: Data, skip: usize) -> Self {
        let callers = if Self::is_library_error(&*cause) {
            Callers::NONE
        } else {
            capture::callers(skip + 1, config::global())
        };
        Self::assemble(code, data, Some(cause), callers)
    }

    /// Shared tail of every constructor. Callers capture before calling this
    /// so the frame count between `capture::callers` and user code is fixed.
    pub(crate) fn assemble(code: Code<C>, data: Data, cause: Option<BoxError>, callers: Callers) -> Self {
        Self {
            code,
            data,
            cause,
            callers,
        }
    }

    #[inline]
    pub(crate) fn is_library_error(err: &(dyn StdError + Send + Sync + 'static)) -> bool {
        err.is::<Error<C>>()
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl<C> Error<C> {
    /// The code given at construction, `Code::Unset` if none was.
    #[inline]
    pub fn code(&self) -> &Code<C> {
        &self.code
    }

    /// The merged data fragments.
    #[inline]
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// The error this one wraps, `None` for root errors.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Resolve the captured stack, frame 0 being the constructor's caller.
    ///
    /// Empty when this error did not capture. Addresses that cannot be
    /// symbolized come back as [`Frame::unknown`] rather than failing.
    pub fn frames(&self) -> Vec<Frame> {
        self.callers.resolve()
    }

    /// True if this error is the origin of its chain.
    #[inline]
    pub fn has_frames(&self) -> bool {
        !self.callers.is_empty()
    }

    /// Consume the error, keeping only its cause.
    pub fn into_cause(self) -> Option<BoxError> {
        self.cause
    }

    /// Consume the error into its code, data and cause.
    pub fn into_parts(self) -> (Code<C>, Data, Option<BoxError>) {
        (self.code, self.data, self.cause)
    }
}

impl<C> Error<C>
where
    C: fmt::Debug + fmt::Display + Send + Sync + 'static,
{
    /// Iterate over this error and every cause below it.
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            next: Some(self as &(dyn StdError + 'static)),
        }
    }

    /// The error in this chain that recorded the stack trace.
    ///
    /// Walks down through `Error<C>` causes and returns the first one holding
    /// frames. `None` when capture was disabled or the chain passes through a
    /// foreign error before reaching an origin.
    pub fn origin(&self) -> Option<&Error<C>> {
        let mut current = self;
        loop {
            if current.has_frames() {
                return Some(current);
            }
            current = current.cause()?.downcast_ref::<Error<C>>()?;
        }
    }
}

/// Iterator returned by [`Error::chain`].
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

// ── std::error::Error ─────────────────────────────────────────────

impl<C> StdError for Error<C>
where
    C: fmt::Debug + fmt::Display,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// ── Display ───────────────────────────────────────────────────────

/// Renders this layer only: the code, then `, data: {..}` when data is
/// present. Causes are reached through [`source`](StdError::source).
///
/// An error built without a code renders the code as `unset`, so an uncoded
/// error with data reads `unset, data: {"key": "value"}` rather than starting
/// with a bare separator.
impl<C: fmt::Display> fmt::Display for Error<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if !self.data.is_empty() {
            write!(f, ", data: {}", self.data)?;
        }
        Ok(())
    }
}

// ── Debug ─────────────────────────────────────────────────────────

impl<C: fmt::Debug> fmt::Debug for Error<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Error");
        d.field("code", &self.code);

        if !self.data.is_empty() {
            d.field("data", &self.data);
        }

        if let Some(cause) = &self.cause {
            d.field("cause", &format_args!("{}", cause));
        }

        if !self.callers.is_empty() {
            d.field("frames", &self.callers.len());
        }

        d.finish()
    }
}
