//! Patch module - Anchor-based text patching
//!
//! Inserts a registration line directly after a known anchor line inside a
//! delimited region of a file (a provider list, a middleware group). Patching
//! is substring-anchored: a missing marker, a missing anchor or an entry that
//! is already registered all leave the content unchanged.
//!
//! # Example
//!
//! ```
//! use stubsmith::patch::{self, Entry};
//!
//! let kernel = "$middlewareGroups = [\n    'web' => [\n        A::class,\n    ],\n];";
//! let entry = Entry::new("A::class,", "B::class,").with_indent("        ");
//!
//! let once = patch::patch_nested_list(
//!     kernel,
//!     &[("$middlewareGroups = [", "];"), ("'web' => [", "],")],
//!     &entry,
//! );
//! assert!(once.contains("A::class,\n        B::class,"));
//!
//! // Running it again changes nothing
//! let twice = patch::patch_nested_list(
//!     &once,
//!     &[("$middlewareGroups = [", "];"), ("'web' => [", "],")],
//!     &entry,
//! );
//! assert_eq!(once, twice);
//! ```

mod internal;

pub use internal::{Block, Entry, Patch, DEFAULT_INDENT, LINE_BREAK};

/// Insert `entry` after its anchor inside the block bounded by `start` and `end`
///
/// Returns the content unchanged when a marker or the anchor is missing, or
/// when the entry's guard key already appears in the block.
pub fn patch_registration_list(content: &str, start: &str, end: &str, entry: &Entry) -> String {
    try_patch_registration_list(content, start, end, entry).into_content(content)
}

/// Same as [`patch_registration_list`] but reports what happened
pub fn try_patch_registration_list(content: &str, start: &str, end: &str, entry: &Entry) -> Patch {
    internal::try_patch_registration_list(content, start, end, entry)
}

/// Insert `entry` inside a block reached through successive `(start, end)` markers
pub fn patch_nested_list(content: &str, markers: &[(&str, &str)], entry: &Entry) -> String {
    try_patch_nested_list(content, markers, entry).into_content(content)
}

/// Same as [`patch_nested_list`] but reports what happened
pub fn try_patch_nested_list(content: &str, markers: &[(&str, &str)], entry: &Entry) -> Patch {
    internal::try_patch_nested_list(content, markers, entry)
}

/// Insert `entry` after its anchor anywhere in `content`
///
/// No guard check: callers wanting idempotence must check for the entry first.
pub fn append_after_line(content: &str, entry: &Entry) -> String {
    internal::append_after_line(content, entry)
}

/// Locate the block between `start` and the first `end` after it
pub fn locate_block(content: &str, start: &str, end: &str) -> Option<Block> {
    Block::locate(content, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "[\n'A::class',\n'B::class'\n]";

    #[test]
    fn test_inserts_after_anchor() {
        let entry = Entry::new("'A::class',", "'C::class',");
        let patched = patch_registration_list(LIST, "[", "]", &entry);
        assert!(patched.contains("'A::class',\n    'C::class',\n'B::class'"));
    }

    #[test]
    fn test_idempotent() {
        let entry = Entry::new("'A::class',", "'C::class',");
        let once = patch_registration_list(LIST, "[", "]", &entry);
        let twice = patch_registration_list(&once, "[", "]", &entry);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_start_marker_is_noop() {
        let entry = Entry::new("'A::class',", "'C::class',");
        assert_eq!(patch_registration_list(LIST, "{", "]", &entry), LIST);
    }

    #[test]
    fn test_missing_anchor_is_noop() {
        let entry = Entry::new("'Z::class',", "'C::class',");
        assert_eq!(patch_registration_list(LIST, "[", "]", &entry), LIST);
    }

    #[test]
    fn test_guard_only_checks_the_block() {
        // C is mentioned outside the block, so it is still inserted inside
        let content = "// uses 'C::class'\n[\n'A::class',\n]";
        let entry = Entry::new("'A::class',", "'C::class',");
        let patched = patch_registration_list(content, "[", "]", &entry);
        assert!(patched.ends_with("'A::class',\n    'C::class',\n]"));
    }

    #[test]
    fn test_first_anchor_only() {
        let content = "[\nA,\nA,\n]";
        let entry = Entry::new("A,", "B,");
        assert_eq!(patch_registration_list(content, "[", "]", &entry), "[\nA,\n    B,\nA,\n]");
    }

    #[test]
    fn test_text_outside_block_untouched() {
        // Same anchor text precedes the block and must not be patched
        let content = "A,\nlist = [\nA,\n];\n";
        let entry = Entry::new("A,", "B,");
        let patched = patch_registration_list(content, "list = [", "];", &entry);
        assert_eq!(patched, "A,\nlist = [\nA,\n    B,\n];\n");
    }

    #[test]
    fn test_entry_with_end_marker_is_noop() {
        // Inserting `x[],` would end the block early and repeat on every run
        let content = "[\nA,\n]";
        let entry = Entry::new("A,", "x[],");
        assert_eq!(patch_registration_list(content, "[", "]", &entry), content);
    }

    #[test]
    fn test_locate_block_nested() {
        let kernel = "$middlewareGroups = [\n    'web' => [\n        A::class,\n    ],\n];";
        let groups = locate_block(kernel, "$middlewareGroups = [", "];").unwrap();
        let web = groups.locate_within(kernel, "'web' => [", "],").unwrap();
        assert_eq!(web.text(kernel), "\n        A::class,\n    ");
        assert!(locate_block(kernel, "'api' => [", "],").is_none());
    }

    #[test]
    fn test_append_after_line() {
        let content = "one\ntwo\n";
        let entry = Entry::new("one", "inserted").with_indent("");
        assert_eq!(append_after_line(content, &entry), "one\ninserted\ntwo\n");
    }

    #[test]
    fn test_append_after_line_has_no_guard() {
        let content = "one\ninserted\n";
        let entry = Entry::new("one", "inserted").with_indent("");
        assert_eq!(append_after_line(content, &entry), "one\ninserted\ninserted\n");
    }

    #[test]
    fn test_append_after_missing_line_is_noop() {
        let entry = Entry::new("absent", "inserted");
        assert_eq!(append_after_line("one\n", &entry), "one\n");
    }
}
