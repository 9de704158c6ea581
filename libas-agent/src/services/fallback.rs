// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Deterministic, vocabulary-driven entity extraction.
//!
//! Used on its own when the language model is unavailable, and as the base
//! layer under the model's output otherwise.

use crate::models::entities::{EntitySet, Gender};
use crate::services::vocabulary::{
    first_match, CATEGORY_TERMS, COLOR_TERMS, DISCOUNT_PATTERN, FABRIC_TERMS, FEMALE_PATTERN,
    MALE_PATTERN, NOVELTY_PATTERN, STYLE_TERMS,
};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// How a matched price phrase constrains the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PriceRule {
    /// Single captured amount is an upper bound
    Max,
    /// Two captured amounts are the lower and upper bounds
    Range,
}

lazy_static! {
    /// Price phrases in priority order; the first one that matches wins
    static ref PRICE_PATTERNS: Vec<(Regex, PriceRule)> = vec![
        (Regex::new(r"(?i)\bunder\s+(\d[\d,]*)").unwrap(), PriceRule::Max),
        (Regex::new(r"(?i)\bbelow\s+(\d[\d,]*)").unwrap(), PriceRule::Max),
        (Regex::new(r"(?i)\bless\s+than\s+(\d[\d,]*)").unwrap(), PriceRule::Max),
        (Regex::new(r"(?i)\bup\s+to\s+(\d[\d,]*)").unwrap(), PriceRule::Max),
        (Regex::new(r"(\d+)\s*-\s*(\d+)").unwrap(), PriceRule::Range),
        // A run of exactly 3 to 5 digits, currency prefixes and suffixes allowed
        (Regex::new(r"(?:^|\D)(\d{3,5})(?:\D|$)").unwrap(), PriceRule::Max),
    ];
}

/// Extract whatever entities the fixed vocabularies can find in `query`.
///
/// Never fails; unmatched attributes are left absent.
pub fn extract(query: &str) -> EntitySet {
    let text = query.trim();
    if text.is_empty() {
        return EntitySet::default();
    }

    let (min_price, max_price) = extract_price(text);

    EntitySet {
        color: first_match(&COLOR_TERMS, text).map(str::to_string),
        fabric: first_match(&FABRIC_TERMS, text).map(str::to_string),
        category: first_match(&CATEGORY_TERMS, text).map(str::to_string),
        gender: extract_gender(text),
        style: first_match(&STYLE_TERMS, text).map(str::to_string),
        min_price,
        max_price,
        is_new: NOVELTY_PATTERN.is_match(text).then_some(true),
        has_discount: DISCOUNT_PATTERN.is_match(text).then_some(true),
    }
}

/// Resolve gender from the synonym sets.
///
/// When both sets occur, the synonym appearing earliest in the query wins.
fn extract_gender(text: &str) -> Option<Gender> {
    let male = MALE_PATTERN.find(text).map(|m| m.start());
    let female = FEMALE_PATTERN.find(text).map(|m| m.start());

    match (male, female) {
        (Some(m), Some(f)) if f < m => Some(Gender::Female),
        (Some(_), _) => Some(Gender::Male),
        (None, Some(_)) => Some(Gender::Female),
        (None, None) => None,
    }
}

fn extract_price(text: &str) -> (Option<u32>, Option<u32>) {
    for (pattern, rule) in PRICE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        match rule {
            PriceRule::Max => {
                if let Some(max) = amount(&caps, 1) {
                    return (None, Some(max));
                }
            }
            PriceRule::Range => {
                if let (Some(min), Some(max)) = (amount(&caps, 1), amount(&caps, 2)) {
                    return (Some(min), Some(max));
                }
            }
        }
    }
    (None, None)
}

/// Parse capture group `idx` as an amount, ignoring thousands separators
fn amount(caps: &Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx)?.as_str().replace(',', "").parse().ok()
}
