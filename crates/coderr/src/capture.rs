//! Stack capture at chain origins.
//!
//! The walk starts in the unwinder's own frames, passes through
//! [`callers`] and the public constructor, then reaches user code:
//!
//! ```text
//!  innermost                                              outermost
//! ┌───────────────────┬───────────┬──────────────┬────────┬─────┐
//! │ backtrace::trace  │ callers() │ Error::new() │ caller │ ... │
//! │ (unwinder frames) │  anchor   │  skip = 1    │ frame 0│     │
//! └───────────────────┴───────────┴──────────────┴────────┴─────┘
//! ```
//!
//! Frames up to and including the anchor are found by comparing each frame's
//! symbol start address with the address of `callers` itself, which is never
//! inlined. The `skip` frames after it belong to the library and are
//! dropped by count. Only raw addresses are kept.

use crate::config::CaptureConfig;
use crate::frame::Callers;

/// Hard ceiling on captured frames per origin.
pub const MAX_DEPTH: usize = 32;

/// Frames we are willing to walk looking for the anchor before giving up.
#[cfg(all(feature = "capture", not(target_family = "wasm")))]
const ANCHOR_SEARCH: usize = 32;

/// Capture the caller's stack.
///
/// `skip` is the number of library frames between this function and the
/// code that should appear as frame 0. Every caller of `callers` must be
/// `#[inline(never)]` so that count holds.
#[inline(never)]
pub(crate) fn callers(skip: usize, config: &CaptureConfig) -> Callers {
    if !config.enabled {
        return Callers::NONE;
    }
    walk(skip, config.depth.clamp(1, MAX_DEPTH))
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "capture", not(target_family = "wasm")))] {
        fn walk(skip: usize, depth: usize) -> Callers {
            let anchor = (callers as fn(usize, &CaptureConfig) -> Callers) as usize;

            // Everything seen before the anchor, kept in case it never shows.
            let mut prefix: Vec<usize> = Vec::new();
            let mut ips: Vec<usize> = Vec::with_capacity(depth);
            let mut anchored = false;
            let mut skipped = 0;

            backtrace::trace(|frame| {
                let ip = frame.ip() as usize;

                if !anchored {
                    if frame.symbol_address() as usize == anchor {
                        anchored = true;
                        return true;
                    }
                    prefix.push(ip);
                    return prefix.len() < ANCHOR_SEARCH + MAX_DEPTH;
                }

                if skipped < skip {
                    skipped += 1;
                    return true;
                }

                ips.push(ip);
                ips.len() < depth
            });

            if !anchored {
                // No symbol start addresses on this target (Apple returns the
                // ip itself).
                tracing::trace!(walked = prefix.len(), "capture anchor not found by address");
                return after_anchor(prefix, is_anchor_symbol, skip, depth);
            }

            Callers::from_ips(ips)
        }

        /// Slice a raw walk at the first frame `is_anchor` accepts, dropping
        /// it and `skip` more. Keeps the whole walk when no frame matches.
        fn after_anchor<F>(walked: Vec<usize>, is_anchor: F, skip: usize, depth: usize) -> Callers
        where
            F: Fn(usize) -> bool,
        {
            let start = walked
                .iter()
                .position(|&ip| is_anchor(ip))
                .map_or(0, |i| i + 1 + skip);
            Callers::from_ips(walked.into_iter().skip(start).take(depth).collect())
        }

        fn is_anchor_symbol(ip: usize) -> bool {
            let frame = crate::frame::resolve_ip(ip);
            frame.function() == concat!(module_path!(), "::callers")
        }
    } else {
        fn walk(_skip: usize, _depth: usize) -> Callers {
            Callers::NONE
        }
    }
}

#[cfg(all(test, feature = "capture", not(target_family = "wasm")))]
mod tests {
    use super::*;

    fn on() -> CaptureConfig {
        CaptureConfig::default()
    }

    #[inline(never)]
    fn nested(levels: usize) -> Callers {
        if levels == 0 {
            callers(0, &on())
        } else {
            std::hint::black_box(nested(levels - 1))
        }
    }

    #[test]
    fn captures_something() {
        let c = callers(0, &on());
        assert!(!c.is_empty());
    }

    #[test]
    fn bounded_by_max_depth() {
        let c = nested(MAX_DEPTH * 2);
        assert!(c.len() <= MAX_DEPTH, "captured {} frames", c.len());
        assert_eq!(c.len(), MAX_DEPTH);
    }

    #[inline(never)]
    fn library_helper() -> Callers {
        std::hint::black_box(callers(1, &on()))
    }

    #[test]
    fn skip_drops_library_frames() {
        let frames = std::hint::black_box(library_helper()).resolve();
        let first = frames.first().expect("no frames captured");
        assert!(
            first.function().ends_with("skip_drops_library_frames"),
            "frame 0 was {}",
            first
        );
    }

    #[test]
    fn frame_zero_is_direct_caller() {
        let frames = callers(0, &on()).resolve();
        let first = frames.first().expect("no frames captured");
        assert!(
            first.function().ends_with("frame_zero_is_direct_caller"),
            "frame 0 was {}",
            first
        );
    }

    #[test]
    fn disabled_captures_nothing() {
        let c = callers(0, &on().enabled(false));
        assert!(c.is_empty());
    }

    #[test]
    fn configured_depth_limits_walk() {
        let c = nested_with(10, &on().depth(4));
        assert_eq!(c.len(), 4);
    }

    #[inline(never)]
    fn nested_with(levels: usize, config: &CaptureConfig) -> Callers {
        if levels == 0 {
            callers(0, config)
        } else {
            std::hint::black_box(nested_with(levels - 1, config))
        }
    }

    #[test]
    fn fallback_slices_after_named_anchor() {
        let walked = vec![10, 11, 0xA, 20, 30, 31, 32];
        let c = after_anchor(walked, |ip| ip == 0xA, 1, MAX_DEPTH);
        assert_eq!(c, Callers::from_ips(vec![30, 31, 32]));
    }

    #[test]
    fn fallback_respects_depth() {
        let walked = vec![0xA, 1, 2, 3, 4, 5];
        let c = after_anchor(walked, |ip| ip == 0xA, 0, 2);
        assert_eq!(c, Callers::from_ips(vec![1, 2]));
    }

    #[test]
    fn fallback_keeps_whole_walk_without_anchor() {
        let walked = vec![1, 2, 3];
        let c = after_anchor(walked.clone(), |_| false, 1, MAX_DEPTH);
        assert_eq!(c, Callers::from_ips(walked));
    }
}
