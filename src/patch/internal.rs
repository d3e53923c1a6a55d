//! Internal implementation for patch module
//!
//! Blocks are byte spans into the full file content. Splicing replaces the
//! span itself, so identical text elsewhere in the file is left alone.

use std::ops::Range;

/// Line break placed between the anchor and the inserted line
pub const LINE_BREAK: &str = "\n";

/// Indentation used when an entry does not set its own
pub const DEFAULT_INDENT: &str = "    ";

// =============================================================================
// Blocks
// =============================================================================

/// Region strictly between a start marker and the first end marker after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    span: Range<usize>,
}

impl Block {
    /// Locate a block in `content`. `None` when either marker is missing.
    pub fn locate(content: &str, start: &str, end: &str) -> Option<Self> {
        let open = content.find(start)? + start.len();
        let close = open + content[open..].find(end)?;
        Some(Self { span: open..close })
    }

    /// Locate a block nested inside this one. Offsets stay relative to `content`.
    pub fn locate_within(&self, content: &str, start: &str, end: &str) -> Option<Self> {
        let inner = Self::locate(self.text(content), start, end)?;
        let base = self.span.start;
        Some(Self {
            span: base + inner.span.start..base + inner.span.end,
        })
    }

    pub fn text<'c>(&self, content: &'c str) -> &'c str {
        &content[self.span.clone()]
    }

    /// Replace the block's span in `content` with `replacement`
    pub fn splice(&self, content: &str, replacement: &str) -> String {
        let mut out = String::with_capacity(content.len() - self.span.len() + replacement.len());
        out.push_str(&content[..self.span.start]);
        out.push_str(replacement);
        out.push_str(&content[self.span.end..]);
        out
    }
}

// =============================================================================
// Entries
// =============================================================================

/// A line to insert after an existing anchor line
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub anchor: &'a str,
    pub line: &'a str,
    pub indent: &'a str,
    guard: Option<&'a str>,
}

impl<'a> Entry<'a> {
    pub fn new(anchor: &'a str, line: &'a str) -> Self {
        Self {
            anchor,
            line,
            indent: DEFAULT_INDENT,
            guard: None,
        }
    }

    pub fn with_indent(mut self, indent: &'a str) -> Self {
        self.indent = indent;
        self
    }

    /// Override the key checked for pre-existence
    pub fn with_guard(mut self, key: &'a str) -> Self {
        self.guard = Some(key);
        self
    }

    /// Key whose presence means the entry is already registered.
    ///
    /// Defaults to the line without surrounding whitespace and its trailing comma.
    /// An empty key cannot guard anything and is refused by the patch operations.
    pub fn guard_key(&self) -> &'a str {
        match self.guard {
            Some(key) => key,
            None => {
                let line = self.line.trim();
                line.strip_suffix(',').unwrap_or(line).trim_end()
            }
        }
    }

    fn expanded(&self) -> String {
        format!("{}{}{}{}", self.anchor, LINE_BREAK, self.indent, self.line)
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of attempting a patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// The entry was inserted; carries the full modified content
    Inserted(String),
    /// The guard key is already present, nothing to do
    AlreadyPresent,
    /// A start or end marker is missing
    MarkersNotFound,
    /// The region exists but does not contain the anchor
    AnchorNotFound,
    /// The guard key is empty, so a repeated patch could not be detected
    EmptyGuard,
    /// The inserted line would cut the region short and be inserted again on the next run
    EntryBreaksBlock,
}

impl Patch {
    /// Modified content, or the original when nothing was inserted
    pub fn into_content(self, original: &str) -> String {
        match self {
            Patch::Inserted(content) => content,
            _ => original.to_string(),
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, Patch::Inserted(_))
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Insert after the first occurrence of the anchor, `None` when the anchor is absent
fn insert_after(text: &str, entry: &Entry) -> Option<String> {
    let at = text.find(entry.anchor)?;
    let mut out = String::with_capacity(text.len() + entry.line.len() + entry.indent.len() + 1);
    out.push_str(&text[..at]);
    out.push_str(&entry.expanded());
    out.push_str(&text[at + entry.anchor.len()..]);
    Some(out)
}

fn locate_nested(content: &str, markers: &[(&str, &str)]) -> Option<Block> {
    let ((start, end), rest) = markers.split_first()?;
    let mut block = Block::locate(content, start, end);
    for (start, end) in rest {
        block = block.and_then(|outer| outer.locate_within(content, start, end));
    }
    block
}

/// Patch inside the block found by `locate`, which is re-run on the result
fn patch_block(content: &str, locate: impl Fn(&str) -> Option<Block>, entry: &Entry) -> Patch {
    let Some(block) = locate(content) else {
        return Patch::MarkersNotFound;
    };

    let guard = entry.guard_key();
    if guard.is_empty() {
        return Patch::EmptyGuard;
    }

    let text = block.text(content);
    if text.contains(guard) {
        return Patch::AlreadyPresent;
    }

    let Some(modified) = insert_after(text, entry) else {
        return Patch::AnchorNotFound;
    };
    let patched = block.splice(content, &modified);

    // The next run must see the guard inside the block or it inserts again
    match locate(&patched) {
        Some(after) if after.text(&patched).contains(guard) => Patch::Inserted(patched),
        _ => Patch::EntryBreaksBlock,
    }
}

pub fn try_patch_registration_list(content: &str, start: &str, end: &str, entry: &Entry) -> Patch {
    patch_block(content, |c| Block::locate(c, start, end), entry)
}

pub fn try_patch_nested_list(content: &str, markers: &[(&str, &str)], entry: &Entry) -> Patch {
    patch_block(content, |c| locate_nested(c, markers), entry)
}

pub fn append_after_line(content: &str, entry: &Entry) -> String {
    insert_after(content, entry).unwrap_or_else(|| content.to_string())
}
