// src/text.rs

//! Text transforms shared by the repository
//!
//! - [`normalize_name`]: canonical form of an ingredient or tag name
//! - [`slugify`]: URL slug derived from a recipe name
//! - [`split_paragraphs`]: instruction text split on blank lines

/// Maximum length of a recipe slug
pub const SLUG_MAX_LEN: usize = 24;

/// Canonicalize a name before any comparison or storage
///
/// Underscores become spaces, control characters are dropped and runs of
/// whitespace collapse to a single space with the ends trimmed. Case is
/// preserved; comparisons are case-insensitive at the storage layer.
pub fn normalize_name(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .map(|c| if c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive a URL slug from `text`
///
/// Lowercases, turns spaces into dashes and keeps only ASCII letters,
/// digits and dashes. Longer slugs drop trailing words until they fit in
/// `max_len`; a single oversized word is cut.
pub fn slugify(text: &str, max_len: usize) -> String {
    let text: String = text
        .trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    let mut words: Vec<&str> = text.split('-').collect();
    loop {
        let slug = words.join("-");
        if slug.len() <= max_len {
            return slug;
        }
        if words.len() == 1 {
            return slug[..max_len].to_string();
        }
        words.pop();
    }
}

/// Split text into paragraphs on blank lines, joining wrapped lines
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.trim()
        .split("\n\n")
        .map(|p| p.replace('\n', " "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("cream_cheese"), "cream cheese");
        assert_eq!(normalize_name("  Brie   cheese "), "Brie cheese");
        assert_eq!(normalize_name("olive\toil"), "olive oil");
        assert_eq!(normalize_name("egg\u{0007}s"), "eggs");
        assert_eq!(normalize_name("__"), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Cheese and Pesto Spread", SLUG_MAX_LEN), "cheese-and-pesto-spread");
        assert_eq!(
            slugify("Grandma's Famous Chocolate Chip Cookies", SLUG_MAX_LEN),
            "grandmas-famous"
        );
        assert_eq!(slugify("Supercalifragilistic", 10), "supercalif");
        assert_eq!(slugify("", SLUG_MAX_LEN), "");
    }

    #[test]
    fn test_split_paragraphs() {
        let text = "\nSoften cheese.\nBeat well.\n\nChill 6 hours.\n";
        assert_eq!(
            split_paragraphs(text),
            vec!["Soften cheese. Beat well.".to_string(), "Chill 6 hours.".to_string()]
        );
    }
}
