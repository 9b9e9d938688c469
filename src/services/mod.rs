//! Business logic services.

pub mod auth;
pub mod category;
pub mod order;
pub mod product;
pub mod upload;
pub mod user;

/// Build an `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\` escaped.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
