//! Balanced-delimiter scanning, annotation block bounds and code masking.
//!
//! Every helper works on raw bytes. The delimiters are ASCII, so every offset
//! they return falls on a UTF-8 character boundary.

/// Returns the offset one past the delimiter closing the group opened at `open_offset`.
///
/// Nested groups of the same pair are counted so they do not end the scan
/// early. Delimiters inside string and character literals or comments are
/// ignored. When the group never closes the end of `text` is returned.
///
/// # Example
///
/// ```
/// use apidoc_from_source::extractor::delimiter::find_matching;
///
/// let text = "call(a, f(b), c) rest";
/// assert_eq!(find_matching(text, 4, b'(', b')'), 16);
/// ```
pub fn find_matching(text: &str, open_offset: usize, open: u8, close: u8) -> usize {
    let bytes = text.as_bytes();
    debug_assert!(
        bytes.get(open_offset) == Some(&open),
        "find_matching must start on an opening delimiter"
    );

    let mut depth = 0usize;
    let mut literal = LiteralState::default();
    for (i, &byte) in bytes.iter().enumerate().skip(open_offset) {
        if literal.consume(byte) {
            continue;
        }
        if byte == open {
            depth += 1;
        } else if byte == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + 1;
            }
        }
    }
    text.len()
}

/// Returns the annotation block that precedes the declaration starting at `end`.
///
/// The block begins right after the last `}` before `end` that closes a
/// declaration body, i.e. one not nested inside an annotation's argument
/// parentheses such as `@ApiResponses({ ... })`. Without such a brace the
/// block starts at offset 0.
pub fn annotation_block(text: &str, end: usize) -> &str {
    let end = end.min(text.len());
    let mut start = 0;
    let mut paren_depth = 0usize;
    let mut literal = LiteralState::default();

    for (i, &byte) in text.as_bytes()[..end].iter().enumerate() {
        if literal.consume(byte) {
            continue;
        }
        match byte {
            b'(' => paren_depth += 1,
            b')' => paren_depth = paren_depth.saturating_sub(1),
            b'}' if paren_depth == 0 => start = i + 1,
            _ => {}
        }
    }
    &text[start..end]
}

/// Returns the parenthesized argument text following the name that ends at `name_end`.
///
/// Works for annotation arguments and method parameter lists alike.
/// Whitespace between the name and `(` is allowed. The second value is the
/// offset just past the closing parenthesis. Returns `None` when no `(`
/// follows, as for a marker annotation.
pub fn arguments_after(text: &str, name_end: usize) -> Option<(&str, usize)> {
    let open = name_end + text.get(name_end..)?.len() - text[name_end..].trim_start().len();
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }
    let end = find_matching(text, open, b'(', b')');
    let inner_end = if text.as_bytes()[end - 1] == b')' && end - 1 > open {
        end - 1
    } else {
        end
    };
    Some((&text[open + 1..inner_end], end))
}

/// Marks which byte offsets of a text are code rather than literal or comment.
///
/// Pattern matches are filtered through [`CodeMask::is_code`] so that an
/// annotation inside `// ...`, `/* ... */` or a string literal is not taken
/// for a declaration.
#[derive(Debug, Clone)]
pub struct CodeMask {
    code: Vec<bool>,
}

impl CodeMask {
    pub fn new(text: &str) -> Self {
        let mut literal = LiteralState::default();
        Self {
            code: text.bytes().map(|byte| !literal.consume(byte)).collect(),
        }
    }

    /// True when `offset` is in code; false past the end.
    pub fn is_code(&self, offset: usize) -> bool {
        self.code.get(offset).copied().unwrap_or(false)
    }
}

/// Tracks whether a forward byte scan is inside a literal or a comment.
#[derive(Default)]
pub(crate) struct LiteralState {
    mode: Mode,
    prev: u8,
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum Mode {
    #[default]
    Code,
    Quoted { quote: u8, escaped: bool },
    LineComment,
    BlockComment,
}

impl LiteralState {
    /// Feeds one byte; returns true when the byte belongs to a literal or comment.
    pub(crate) fn consume(&mut self, byte: u8) -> bool {
        let prev = std::mem::replace(&mut self.prev, byte);
        match self.mode {
            Mode::Code => match byte {
                b'"' | b'\'' => {
                    self.mode = Mode::Quoted { quote: byte, escaped: false };
                    true
                }
                b'/' if prev == b'/' => {
                    self.mode = Mode::LineComment;
                    true
                }
                b'*' if prev == b'/' => {
                    self.mode = Mode::BlockComment;
                    // the opening star must not close the comment
                    self.prev = 0;
                    true
                }
                _ => false,
            },
            Mode::Quoted { quote, escaped } => {
                self.mode = if escaped {
                    Mode::Quoted { quote, escaped: false }
                } else if byte == b'\\' {
                    Mode::Quoted { quote, escaped: true }
                } else if byte == quote {
                    Mode::Code
                } else {
                    self.mode
                };
                // a closing quote never starts a comment
                self.prev = 0;
                true
            }
            Mode::LineComment => {
                if byte == b'\n' {
                    self.mode = Mode::Code;
                }
                true
            }
            Mode::BlockComment => {
                if byte == b'/' && prev == b'*' {
                    self.mode = Mode::Code;
                    self.prev = 0;
                }
                true
            }
        }
    }
}
