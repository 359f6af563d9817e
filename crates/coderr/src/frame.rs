//! Captured stack locations and their on-demand resolution.
//!
//! Capture stores only return addresses, packed as `usize` so that errors
//! stay `Send + Sync`:
//!
//! ```text
//! Error::new(..)              Error::frames()
//!       │                           │
//!       ▼  capture::callers()       ▼  Callers::resolve()
//! Callers [ip0, ip1, .. ipN]  ──►  [Frame { path, line, function }, ..]
//!       (cheap, every error)        (symbol lookup, only when asked)
//! ```
//!
//! Resolution is recomputed on every call and never cached, so an error
//! that nobody inspects never pays for symbolization.

use std::fmt;

/// Placeholder used for a path or function name that could not be resolved.
pub const UNKNOWN: &str = "UNKNOWN";

/// One resolved stack location.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    path: String,
    line: u32,
    function: String,
}

impl Frame {
    /// A frame for an address that resolved to nothing.
    pub fn unknown() -> Self {
        Self {
            path: UNKNOWN.to_string(),
            line: 0,
            function: UNKNOWN.to_string(),
        }
    }

    #[cfg_attr(not(feature = "capture"), allow(dead_code))]
    pub(crate) fn new(path: String, line: u32, function: String) -> Self {
        Self { path, line, function }
    }

    /// Source file path as recorded in the debug info.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Line number, `0` when unknown.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Fully qualified, demangled function name without the hash suffix.
    #[inline]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// True if at least the function name was recovered.
    pub fn is_resolved(&self) -> bool {
        self.function != UNKNOWN
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.function, self.path, self.line)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("function", &self.function)
            .field("location", &format_args!("{}:{}", self.path, self.line))
            .finish()
    }
}

/// Raw return addresses captured at an error's origin, nearest first.
#[derive(Clone, Default, PartialEq, Eq)]
pub(crate) struct Callers {
    ips: Vec<usize>,
}

impl Callers {
    /// No capture took place.
    pub(crate) const NONE: Callers = Callers { ips: Vec::new() };

    #[cfg_attr(not(all(feature = "capture", not(target_family = "wasm"))), allow(dead_code))]
    pub(crate) fn from_ips(ips: Vec<usize>) -> Self {
        Self { ips }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.ips.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    /// Symbolize every address in capture order.
    pub(crate) fn resolve(&self) -> Vec<Frame> {
        self.ips.iter().map(|&ip| resolve_ip(ip)).collect()
    }
}

impl fmt::Debug for Callers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, ip) in self.ips.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:#x}", ip)?;
        }
        f.write_str("]")
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "capture")] {
        pub(crate) fn resolve_ip(ip: usize) -> Frame {
            let mut frame: Option<Frame> = None;

            // Inlined calls report several symbols for one address; the
            // first is the innermost, which owns the call site's line.
            backtrace::resolve(ip as *mut std::ffi::c_void, |symbol| {
                if frame.is_some() {
                    return;
                }
                let path = symbol
                    .filename()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_else(|| UNKNOWN.to_string());
                let line = symbol.lineno().unwrap_or(0);
                let function = symbol
                    .name()
                    .map(|name| format!("{:#}", name))
                    .unwrap_or_else(|| UNKNOWN.to_string());
                frame = Some(Frame::new(path, line, function));
            });

            frame.unwrap_or_else(Frame::unknown)
        }
    } else {
        pub(crate) fn resolve_ip(_ip: usize) -> Frame {
            Frame::unknown()
        }
    }
}
