use crate::consts::{self, FALLBACK_VARIABLE_NAME};

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Turn free text (usually a tag attribute) into a usable identifier.
///
/// Leading characters that cannot start an identifier are dropped, later `-`
/// and `:` become `_`, other invalid characters are dropped. Empty results fall
/// back to `cmp`; keywords get a trailing `_`.
pub fn to_identifier(desired: &str) -> String {
    let mut name = String::with_capacity(desired.len());
    for c in desired.trim().chars() {
        if name.is_empty() {
            if is_identifier_start(c) {
                name.push(c);
            }
        } else if is_identifier_part(c) {
            name.push(c);
        } else if c == '-' || c == ':' {
            name.push('_');
        }
    }
    if name.is_empty() {
        return FALLBACK_VARIABLE_NAME.to_string();
    }
    if consts::is_keyword(&name) {
        name.push('_');
    }
    name
}

/// First of `base`, `base2`, `base3`, ... that `taken` rejects
pub fn unique_name<F>(base: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !taken(base) {
        return base.to_string();
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{}{}", base, suffix);
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
