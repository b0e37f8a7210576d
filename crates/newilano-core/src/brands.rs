use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub categories: Vec<String>,
}

/// Generate a URL-safe slug from a display name.
///
/// Turkish letters are folded to their ASCII base before non-alphanumeric
/// characters are dropped, so `"Öne Çıkan"` becomes `"one-cikan"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(fold_turkish)
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c.is_whitespace() {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn fold_turkish(c: char) -> char {
    match c {
        'ç' | 'Ç' => 'c',
        'ğ' | 'Ğ' => 'g',
        'ı' | 'İ' => 'i',
        'ö' | 'Ö' => 'o',
        'ş' | 'Ş' => 's',
        'ü' | 'Ü' => 'u',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_simple_name() {
        assert_eq!(slugify("New Balance"), "new-balance");
    }

    #[test]
    fn slugify_folds_turkish_letters() {
        assert_eq!(slugify("Öne Çıkan Şık Ürün"), "one-cikan-sik-urun");
    }

    #[test]
    fn slugify_strips_punctuation_and_collapses_dashes() {
        assert_eq!(slugify("Levi's  --  501"), "levis-501");
    }

    #[test]
    fn slugify_drops_other_non_ascii() {
        assert_eq!(slugify("BRĒZ"), "brz");
    }
}
