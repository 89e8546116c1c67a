//! Keeps deeply nested programs from overflowing the native stack.
//!
//! Parsing and evaluation both recurse once per nesting level of the source,
//! so every recursive entry point runs through `ensure_sufficient_stack`.

/// Grows the stack onto the heap when less than the red zone remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 100 * 1024;
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
