// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Fixed vocabularies for rule-based entity extraction.
//!
//! List order matters: when a query mentions two colors, the one listed
//! first here is the one extracted.

use lazy_static::lazy_static;
use regex::Regex;

pub const COLORS: &[&str] = &[
    "red", "blue", "black", "white", "green", "yellow", "pink", "purple", "orange", "brown",
    "grey", "gray", "beige", "cream", "navy", "maroon", "golden", "silver", "teal", "turquoise",
    "coral", "olive", "mustard",
];

pub const FABRICS: &[&str] = &[
    "cotton", "silk", "chiffon", "lawn", "linen", "wool", "velvet", "satin", "organza", "denim",
    "leather", "suede", "polyester", "rayon", "lycra",
];

/// Categories as (singular, plural); the singular is the stored form
pub const CATEGORIES: &[(&str, &str)] = &[
    ("dress", "dresses"),
    ("kurta", "kurtas"),
    ("kameez", "kameez"),
    ("shirt", "shirts"),
    ("trouser", "trousers"),
    ("pant", "pants"),
    ("jeans", "jeans"),
    ("jacket", "jackets"),
    ("coat", "coats"),
    ("skirt", "skirts"),
    ("top", "tops"),
    ("blouse", "blouses"),
    ("dupatta", "dupattas"),
    ("shawl", "shawls"),
];

pub const STYLES: &[&str] = &[
    "elegant", "casual", "formal", "party", "wedding", "traditional", "modern", "vintage", "chic",
    "minimalist", "luxury", "festive", "printed", "embroidered", "plain", "summer", "winter",
];

pub const MALE_SYNONYMS: &[&str] = &[
    "men's", "men\u{2019}s", "mens", "men", "man", "boys", "boy", "gents", "male",
];

pub const FEMALE_SYNONYMS: &[&str] = &[
    "women's", "women\u{2019}s", "womens", "women", "woman", "girls", "girl", "ladies", "female",
];

pub const NOVELTY_WORDS: &[&str] = &["new", "latest", "fresh", "recent"];

pub const DISCOUNT_WORDS: &[&str] = &["sale", "discount", "offer", "deal"];

/// A vocabulary entry: the canonical value and a matcher over its surface forms
#[derive(Debug)]
pub struct Term {
    pub canonical: &'static str,
    pattern: Regex,
}

impl Term {
    fn new(canonical: &'static str, forms: &[&str]) -> Self {
        Self {
            canonical,
            pattern: word_pattern(forms),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Case-insensitive, word-boundary-anchored alternation over `forms`
pub fn word_pattern(forms: &[&str]) -> Regex {
    let alternation = forms
        .iter()
        .map(|f| regex::escape(f))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("vocabulary pattern is valid")
}

/// First term, in vocabulary order, that occurs in `text`
pub fn first_match(terms: &[Term], text: &str) -> Option<&'static str> {
    terms.iter().find(|t| t.is_match(text)).map(|t| t.canonical)
}

lazy_static! {
    pub static ref COLOR_TERMS: Vec<Term> = COLORS.iter().map(|&c| Term::new(c, &[c])).collect();
    pub static ref FABRIC_TERMS: Vec<Term> = FABRICS.iter().map(|&f| Term::new(f, &[f])).collect();
    pub static ref CATEGORY_TERMS: Vec<Term> = CATEGORIES
        .iter()
        .map(|&(singular, plural)| Term::new(singular, &[singular, plural]))
        .collect();
    pub static ref STYLE_TERMS: Vec<Term> = STYLES.iter().map(|&s| Term::new(s, &[s])).collect();

    pub static ref MALE_PATTERN: Regex = word_pattern(MALE_SYNONYMS);
    pub static ref FEMALE_PATTERN: Regex = word_pattern(FEMALE_SYNONYMS);
    pub static ref NOVELTY_PATTERN: Regex = word_pattern(NOVELTY_WORDS);
    pub static ref DISCOUNT_PATTERN: Regex = word_pattern(DISCOUNT_WORDS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_pattern_respects_boundaries() {
        let pattern = word_pattern(&["red"]);
        assert!(pattern.is_match("a red kurta"));
        assert!(pattern.is_match("RED"));
        assert!(!pattern.is_match("shredded"));
        assert!(!pattern.is_match("reddish"));
    }

    #[test]
    fn test_word_pattern_escapes_apostrophes() {
        let pattern = word_pattern(&["men's"]);
        assert!(pattern.is_match("men's shirts"));
        assert!(!pattern.is_match("women's shirts"));
    }

    #[test]
    fn test_first_match_uses_vocabulary_order() {
        // "blue" comes before "red" in the query, but "red" is listed first
        assert_eq!(first_match(&COLOR_TERMS, "blue and red dress"), Some("red"));
    }

    #[test]
    fn test_category_plural_maps_to_singular() {
        assert_eq!(first_match(&CATEGORY_TERMS, "printed kurtas"), Some("kurta"));
        assert_eq!(first_match(&CATEGORY_TERMS, "dresses"), Some("dress"));
        assert_eq!(first_match(&CATEGORY_TERMS, "jeans"), Some("jeans"));
    }

    #[test]
    fn test_gender_patterns_are_disjoint() {
        assert!(!MALE_PATTERN.is_match("women womens women's woman"));
        assert!(!FEMALE_PATTERN.is_match("men mens men's man"));
        assert!(MALE_PATTERN.is_match("men\u{2019}s kurta"));
    }
}
