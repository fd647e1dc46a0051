//! Debug-only trace of the value type paths currently being walked,
//! appended to engine error messages so a failure deep in a graph
//! names its path from the root.

use std::cell::RefCell;

std::thread_local! {
    static TRACE_STACK: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn push(type_path: &'static str) {
    TRACE_STACK.with_borrow_mut(|stack| stack.push(type_path));
}

pub(crate) fn pop() {
    TRACE_STACK.with_borrow_mut(|stack| {
        stack.pop();
    });
}

pub(crate) fn clear() {
    TRACE_STACK.with_borrow_mut(|stack| stack.clear());
}

/// Returns ` (walking: a -> b -> c)`, or an empty string outside any
/// walk.
pub(crate) fn suffix() -> String {
    TRACE_STACK.with_borrow(|stack| {
        if stack.is_empty() {
            String::new()
        } else {
            format!(" (walking: {})", stack.join(" -> "))
        }
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    #[test]
    fn suffix_tracks_stack() {
        super::clear();
        assert_eq!(super::suffix(), "");

        super::push("A");
        super::push("B");
        assert_eq!(super::suffix(), " (walking: A -> B)");

        super::pop();
        assert_eq!(super::suffix(), " (walking: A)");
        super::clear();
    }
}
