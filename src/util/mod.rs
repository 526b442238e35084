#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic()
}

#[inline]
pub fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

/// Whitespace that has no effect besides separating tokens. Newlines are
/// handled separately because they move the line counter.
#[inline]
pub fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

/// Joins items with `separator` using their `Display` implementations.
pub fn join<T: std::fmt::Display>(items: &[T], separator: &str) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<String>>().join(separator)
}
