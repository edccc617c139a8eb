//! Lexical vocabulary for template placeholders.
//!
//! The scanner and the normalizer must agree on what a placeholder name looks
//! like and on which byte sequences delimit a placeholder, so both read these
//! definitions from here.

/// Character codes for fast comparison
pub mod char_codes {
    pub const LEFT_BRACE: u8 = 0x7B;
    pub const RIGHT_BRACE: u8 = 0x7D;
    pub const PERCENT: u8 = 0x25;
    pub const NUMBER: u8 = 0x23;
}

/// Opening delimiter of a substitution placeholder.
pub const SUBST_OPEN: &str = "{{";
/// Closing delimiter of a substitution placeholder.
pub const SUBST_CLOSE: &str = "}}";
/// Closing delimiter of a control tag.
pub const TAG_CLOSE: &str = "%}";

/// Separator between a root name and its field path.
pub const FIELD_SEPARATOR: char = '.';

/// Regex character-class body for the first character of a name.
///
/// ASCII letters, the Cyrillic block `А..я` plus `Ё`/`ё`, and underscore.
pub const NAME_START_CLASS: &str = "A-Za-zА-Яа-яЁё_";

/// Regex character-class body for the remaining characters of a name.
pub const NAME_CONTINUE_CLASS: &str = "A-Za-zА-Яа-яЁё0-9_";

/// Check if `c` may start a placeholder name.
#[inline]
pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || is_cyrillic_letter(c)
}

/// Check if `c` may continue a placeholder name (no `.`).
#[inline]
pub fn is_name_continue(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

#[inline]
fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, '\u{0410}'..='\u{044F}' | 'Ё' | 'ё')
}

/// Check if `s` is a single, undotted placeholder name.
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_continue),
        _ => false,
    }
}

/// Check if `s` is a name that may be dotted (`a.b.c`).
///
/// Only the first character is constrained to a name start; the rest may be
/// any mix of name characters and separators, matching what the substitution
/// pattern accepts.
pub fn is_dotted_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => {
            chars.all(|c| is_name_continue(c) || c == FIELD_SEPARATOR)
        }
        _ => false,
    }
}

/// Split a captured name into its root and the remaining field path.
///
/// The field path is empty when the name has no separator.
#[inline]
pub fn split_root(name: &str) -> (&str, &str) {
    name.split_once(FIELD_SEPARATOR).unwrap_or((name, ""))
}

/// First segment of a field path (`address.city` -> `address`).
#[inline]
pub fn first_segment(field: &str) -> &str {
    split_root(field).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_start() {
        assert!(is_name_start('a'));
        assert!(is_name_start('Z'));
        assert!(is_name_start('_'));
        assert!(is_name_start('Д'));
        assert!(is_name_start('ё'));
        assert!(is_name_start('Ё'));
        assert!(!is_name_start('1'));
        assert!(!is_name_start('.'));
        assert!(!is_name_start('-'));
        assert!(!is_name_start('é'));
    }

    #[test]
    fn test_is_name() {
        assert!(is_name("name"));
        assert!(is_name("Фамилия_Имя_Отчество"));
        assert!(is_name("_private1"));
        assert!(!is_name("1st"));
        assert!(!is_name("Full Name"));
        assert!(!is_name("дата-договора"));
        assert!(!is_name("a.b"));
        assert!(!is_name(""));
    }

    #[test]
    fn test_is_dotted_name() {
        assert!(is_dotted_name("company.address.city"));
        assert!(is_dotted_name("item"));
        assert!(!is_dotted_name(".item"));
        assert!(!is_dotted_name("item title"));
    }

    #[test]
    fn test_split_root() {
        assert_eq!(split_root("name"), ("name", ""));
        assert_eq!(split_root("item.title"), ("item", "title"));
        assert_eq!(split_root("a.b.c"), ("a", "b.c"));
        assert_eq!(first_segment("address.city"), "address");
        assert_eq!(first_segment("title"), "title");
    }
}
