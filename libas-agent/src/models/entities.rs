// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical gender value stored on products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Value used in the `gender` column of the product table
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured interpretation of a free-text product query.
///
/// Every field is optional; an absent field leaves that attribute
/// unconstrained. At most one value is held per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EntitySet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,
    /// Singular canonical form ("kurta", never "kurtas")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Inclusive lower price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u32>,
    /// Inclusive upper price bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_discount: Option<bool>,
}

impl EntitySet {
    /// True when no attribute was extracted
    pub fn is_empty(&self) -> bool {
        *self == EntitySet::default()
    }

    /// Overlay `top` onto `self` field by field.
    ///
    /// A field present in `top` replaces the base value; fields only the
    /// base carries survive.
    pub fn overlay(self, top: EntitySet) -> EntitySet {
        EntitySet {
            color: top.color.or(self.color),
            fabric: top.fabric.or(self.fabric),
            category: top.category.or(self.category),
            gender: top.gender.or(self.gender),
            style: top.style.or(self.style),
            min_price: top.min_price.or(self.min_price),
            max_price: top.max_price.or(self.max_price),
            is_new: top.is_new.or(self.is_new),
            has_discount: top.has_discount.or(self.has_discount),
        }
    }

    /// Price bounds in ascending order, if any bound is present.
    ///
    /// Inverted bounds (`min_price > max_price`) are swapped.
    pub fn price_bounds(&self) -> (Option<u32>, Option<u32>) {
        ordered_bounds(self.min_price, self.max_price)
    }
}

/// Swap a lower bound that exceeds the upper bound
pub fn ordered_bounds(min: Option<u32>, max: Option<u32>) -> (Option<u32>, Option<u32>) {
    match (min, max) {
        (Some(min), Some(max)) if min > max => (Some(max), Some(min)),
        bounds => bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(EntitySet::default().is_empty());
    }

    #[test]
    fn test_overlay_top_wins_per_field() {
        let base = EntitySet {
            color: Some("red".to_string()),
            fabric: Some("silk".to_string()),
            max_price: Some(5000),
            ..Default::default()
        };
        let top = EntitySet {
            color: Some("maroon".to_string()),
            gender: Some(Gender::Female),
            ..Default::default()
        };

        let merged = base.overlay(top);

        assert_eq!(merged.color.as_deref(), Some("maroon"));
        assert_eq!(merged.fabric.as_deref(), Some("silk"));
        assert_eq!(merged.gender, Some(Gender::Female));
        assert_eq!(merged.max_price, Some(5000));
        assert!(merged.category.is_none());
    }

    #[test]
    fn test_overlay_keeps_explicit_false_from_top() {
        let base = EntitySet {
            is_new: Some(true),
            ..Default::default()
        };
        let top = EntitySet {
            is_new: Some(false),
            ..Default::default()
        };

        assert_eq!(base.overlay(top).is_new, Some(false));
    }

    #[test]
    fn test_price_bounds_swaps_inverted_range() {
        let entities = EntitySet {
            min_price: Some(9000),
            max_price: Some(3000),
            ..Default::default()
        };
        assert_eq!(entities.price_bounds(), (Some(3000), Some(9000)));
    }

    #[test]
    fn test_price_bounds_passes_single_bound() {
        let entities = EntitySet {
            max_price: Some(3000),
            ..Default::default()
        };
        assert_eq!(entities.price_bounds(), (None, Some(3000)));
    }

    #[test]
    fn test_serializes_snake_case_and_skips_absent_fields() {
        let entities = EntitySet {
            category: Some("kurta".to_string()),
            gender: Some(Gender::Male),
            max_price: Some(3000),
            ..Default::default()
        };

        let json = serde_json::to_value(&entities).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"category": "kurta", "gender": "Male", "max_price": 3000})
        );
    }

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::Male.to_string(), "Male");
        assert_eq!(Gender::Female.to_string(), "Female");
    }
}
