//! Stack safety for the recursive stages (parser, resolver, interpreter).
//!
//! Deeply nested source or deep script recursion would otherwise overflow the
//! native stack.  When less than the red zone remains, `stacker` switches to a
//! freshly allocated segment before running the closure.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if the red zone has been reached.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
