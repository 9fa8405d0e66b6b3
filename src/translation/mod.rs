use std::borrow::Cow;

mod lexer;

use lexer::{Context, scan_digits};

/// Rewrite `?` markers into PostgreSQL's numbered `$N` placeholders.
///
/// Every bare `?` becomes `$1`, `$2`, ... in order of appearance and `?N` becomes `$N`.
/// Quoted strings, quoted identifiers, comments and dollar-quoted blocks are left alone.
///
/// A bare `?` in code is always a placeholder, so the JSONB operators `?`, `?|` and `?&`
/// have to be written doubled (`??`, `??|`, `??&`); a doubled mark becomes one literal `?`.
///
/// ```rust
/// use sql_dbal::translation::translate_placeholders;
///
/// let sql = "select * from t where a = ? and b = '?' and tags ?? 'x'";
/// assert_eq!(
///     translate_placeholders(sql),
///     "select * from t where a = $1 and b = '?' and tags ? 'x'"
/// );
/// ```
/// Returns a borrowed `Cow` when no changes are needed.
#[must_use]
pub fn translate_placeholders(sql: &str) -> Cow<'_, str> {
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut context = Context::Code;
    let mut copied_to = 0;
    let mut positional = 0usize;
    let mut idx = 0;

    while idx < bytes.len() {
        if context == Context::Code && bytes[idx] == b'?' {
            let (replacement, end) = placeholder_at(bytes, idx, &mut positional);
            let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
            buf.push_str(&sql[copied_to..idx]);
            buf.push_str(&replacement);
            idx = end;
            copied_to = end;
            continue;
        }

        let (next, extra) = context.advance(bytes, idx);
        context = next;
        idx += 1 + extra;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied_to..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

/// Replacement for the `?` at `idx` and the index just past what it consumed.
fn placeholder_at(bytes: &[u8], idx: usize, positional: &mut usize) -> (String, usize) {
    if bytes.get(idx + 1) == Some(&b'?') {
        return ("?".to_string(), idx + 2);
    }
    match scan_digits(bytes, idx + 1) {
        Some((end, digits)) => (format!("${digits}"), end),
        None => {
            *positional += 1;
            (format!("${positional}"), idx + 1)
        }
    }
}
