//! Helpers shared by the `Display` implementations of the syntax tree.
//!
//! The printed form is normalized TRQL: reparsing it yields the same tree.

use core::fmt::{self, Display, Write};

use crate::lexer::Keyword;

fn has_identifier_syntax(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Returns true if `name` can be printed without quotes.
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    has_identifier_syntax(name) && Keyword::from_str(name).is_none()
}

/// Writes an identifier, backtick-quoting it when it would not lex back as
/// the same plain identifier.
pub(crate) fn write_identifier(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if is_plain_identifier(name) {
        return f.write_str(name);
    }
    write_quoted(f, name)
}

/// Writes a name in a position that only accepts identifiers, such as a
/// column type. Only reserved keywords need quotes there.
pub(crate) fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let reserved = Keyword::from_str(name).is_some_and(Keyword::is_reserved);
    if has_identifier_syntax(name) && !reserved {
        return f.write_str(name);
    }
    write_quoted(f, name)
}

fn write_quoted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    f.write_char('`')?;
    for c in name.chars() {
        match c {
            '`' => f.write_str("``")?,
            '\\' => f.write_str("\\\\")?,
            _ => f.write_char(c)?,
        }
    }
    f.write_char('`')
}

/// Writes a dotted identifier chain such as `db.table.column`.
pub(crate) fn write_chain(f: &mut fmt::Formatter<'_>, chain: &[String]) -> fmt::Result {
    for (i, part) in chain.iter().enumerate() {
        if i > 0 {
            f.write_char('.')?;
        }
        write_identifier(f, part)?;
    }
    Ok(())
}

fn write_escaped_char(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    match c {
        '\\' => f.write_str("\\\\"),
        '\n' => f.write_str("\\n"),
        '\r' => f.write_str("\\r"),
        '\t' => f.write_str("\\t"),
        '\0' => f.write_str("\\0"),
        _ => f.write_char(c),
    }
}

/// Writes a quoted string literal using `quote` as the delimiter.
pub(crate) fn write_string(f: &mut fmt::Formatter<'_>, value: &str, quote: char) -> fmt::Result {
    f.write_char(quote)?;
    for c in value.chars() {
        if c == quote {
            f.write_char('\\')?;
            f.write_char(c)?;
        } else {
            write_escaped_char(f, c)?;
        }
    }
    f.write_char(quote)
}

/// Writes literal template text. Braces are always escaped; the quote only
/// when the template is delimited by one.
pub(crate) fn write_template_text(
    f: &mut fmt::Formatter<'_>,
    text: &str,
    quoted: bool,
) -> fmt::Result {
    for c in text.chars() {
        match c {
            '{' | '}' => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            '\'' if quoted => f.write_str("\\'")?,
            _ => write_escaped_char(f, c)?,
        }
    }
    Ok(())
}

/// Writes items separated by `", "`.
pub(crate) fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write_separated(f, items, ", ")
}

/// Writes items separated by `separator`.
pub(crate) fn write_separated<T: Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// An identifier wrapper that prints with [`write_identifier`].
pub(crate) struct Ident<'a>(pub &'a str);

impl Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, self.0)
    }
}
