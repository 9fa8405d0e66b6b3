/// Lexical context of the byte currently being scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Context {
    Code,
    SingleQuoted,
    DoubleQuoted,
    Backticked,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

impl Context {
    /// Context after consuming the byte at `idx`, plus how many extra bytes were consumed.
    pub(super) fn advance(&self, bytes: &[u8], idx: usize) -> (Context, usize) {
        let b = bytes[idx];
        match self {
            Context::Code => match b {
                b'\'' => (Context::SingleQuoted, 0),
                b'"' => (Context::DoubleQuoted, 0),
                b'`' => (Context::Backticked, 0),
                b'-' if bytes.get(idx + 1) == Some(&b'-') => (Context::LineComment, 1),
                b'/' if bytes.get(idx + 1) == Some(&b'*') => (Context::BlockComment(1), 1),
                b'$' => match dollar_tag(bytes, idx) {
                    Some((tag, end)) => (Context::DollarQuoted(tag), end - idx),
                    None => (Context::Code, 0),
                },
                _ => (Context::Code, 0),
            },
            Context::SingleQuoted => close_quote(bytes, idx, b'\'', Context::SingleQuoted),
            Context::DoubleQuoted => close_quote(bytes, idx, b'"', Context::DoubleQuoted),
            Context::Backticked => close_quote(bytes, idx, b'`', Context::Backticked),
            Context::LineComment if b == b'\n' => (Context::Code, 0),
            Context::LineComment => (Context::LineComment, 0),
            Context::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    (Context::BlockComment(depth + 1), 1)
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    if *depth == 1 {
                        (Context::Code, 1)
                    } else {
                        (Context::BlockComment(depth - 1), 1)
                    }
                } else {
                    (Context::BlockComment(*depth), 0)
                }
            }
            Context::DollarQuoted(tag) => match dollar_tag(bytes, idx) {
                Some((closing, end)) if closing == *tag => (Context::Code, end - idx),
                _ => (Context::DollarQuoted(tag.clone()), 0),
            },
        }
    }
}

fn close_quote(bytes: &[u8], idx: usize, quote: u8, current: Context) -> (Context, usize) {
    if bytes[idx] != quote {
        return (current, 0);
    }
    // doubled quote is an escaped quote
    if bytes.get(idx + 1) == Some(&quote) {
        (current, 1)
    } else {
        (Context::Code, 0)
    }
}

/// Parse a `$tag$` opener/closer starting at `start`; returns the tag and the index of the
/// closing `$`. `$1` is a placeholder, not a tag.
pub(super) fn dollar_tag(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    if bytes.get(start + 1).is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }
    if idx < bytes.len() {
        let tag = std::str::from_utf8(&bytes[start + 1..idx]).ok()?;
        Some((tag.to_string(), idx))
    } else {
        None
    }
}

/// Digits starting at `start`, with the index one past the last digit.
pub(super) fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == start {
        None
    } else {
        std::str::from_utf8(&bytes[start..idx])
            .ok()
            .map(|digits| (idx, digits))
    }
}
