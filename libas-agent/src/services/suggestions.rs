// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Autocomplete suggestions built from catalog attributes.

use crate::error::StoreError;
use crate::models::product::ProductRecord;
use crate::models::search::PageRange;
use crate::services::catalog::ProductStore;
use crate::services::filter::{Field, Predicate, ProductFilter};

/// Shorter fragments produce no suggestions
pub const MIN_FRAGMENT_CHARS: usize = 2;
pub const DEFAULT_SUGGESTIONS: u32 = 5;
pub const MAX_SUGGESTIONS: u32 = 20;

/// Rows fetched per requested suggestion, since many rows yield duplicates
const ROWS_PER_SUGGESTION: u32 = 3;

/// Suggest completions for a partial query.
pub async fn suggest(
    store: &dyn ProductStore,
    fragment: &str,
    limit: u32,
) -> Result<Vec<String>, StoreError> {
    let fragment = fragment.trim();
    if fragment.chars().count() < MIN_FRAGMENT_CHARS {
        return Ok(Vec::new());
    }
    let limit = limit.clamp(1, MAX_SUGGESTIONS);

    let filter = ProductFilter {
        predicates: vec![
            Predicate::InStock,
            Predicate::AnyContains(
                vec![
                    Field::Name,
                    Field::Category,
                    Field::Brand,
                    Field::Fabric,
                    Field::Color,
                ],
                fragment.to_string(),
            ),
        ],
    };
    let page = store
        .find_products(&filter, PageRange::new(limit * ROWS_PER_SUGGESTION, 0))
        .await?;

    Ok(collect_suggestions(&page.products, fragment, limit as usize))
}

/// Distinct suggestions in row order: matching name, category and brand
/// as stored, then lower-cased "fabric category" and "color category".
fn collect_suggestions(rows: &[ProductRecord], fragment: &str, limit: usize) -> Vec<String> {
    let needle = fragment.to_lowercase();
    let hit = |value: &str| value.to_lowercase().contains(&needle);

    let mut suggestions: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !suggestions.contains(&candidate) {
            suggestions.push(candidate);
        }
    };

    for row in rows {
        for value in [&row.name, &row.category, &row.brand] {
            if hit(value) {
                push(value.clone());
            }
        }
        for value in [&row.fabric, &row.color].into_iter().flatten() {
            if hit(value) {
                push(format!("{value} {}", row.category).to_lowercase());
            }
        }
    }

    suggestions.truncate(limit);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MemoryProductStore;
    use chrono::Utc;

    fn product(id: i64, name: &str, category: &str, fabric: &str, color: &str) -> ProductRecord {
        ProductRecord {
            id,
            name: name.to_string(),
            brand: "Bonanza Satrangi".to_string(),
            price: 5000,
            category: category.to_string(),
            fabric: Some(fabric.to_string()),
            color: Some(color.to_string()),
            style: None,
            gender: None,
            is_new: None,
            discount: None,
            in_stock: true,
            scraped_at: Utc::now(),
            image_url: None,
            product_url: None,
        }
    }

    #[test]
    fn test_collect_suggestions_order_and_dedup() {
        let rows = vec![
            product(1, "Silk Kurta", "Kurta", "Silk", "Maroon"),
            product(2, "Printed Silk Shirt", "Shirt", "Silk", "Black"),
            product(3, "Silk Kurta", "Kurta", "Silk", "Gold"),
        ];

        assert_eq!(
            collect_suggestions(&rows, "silk", 10),
            vec![
                "Silk Kurta",
                "silk kurta",
                "Printed Silk Shirt",
                "silk shirt",
            ]
        );
    }

    #[test]
    fn test_collect_suggestions_color_combination() {
        let rows = vec![product(1, "Eid Collection", "Lawn Suit", "Lawn", "Mint Green")];
        assert_eq!(
            collect_suggestions(&rows, "green", 5),
            vec!["mint green lawn suit"]
        );
    }

    #[test]
    fn test_collect_suggestions_truncates() {
        let rows = vec![
            product(1, "Sa One", "Kurta", "Cotton", "Red"),
            product(2, "Sa Two", "Kurta", "Cotton", "Red"),
            product(3, "Sa Three", "Kurta", "Cotton", "Red"),
        ];
        // Brand "Bonanza Satrangi" also contains "sa"
        assert_eq!(
            collect_suggestions(&rows, "sa", 2),
            vec!["Sa One", "Bonanza Satrangi"]
        );
    }

    #[tokio::test]
    async fn test_short_fragment_yields_nothing() {
        let store = MemoryProductStore::new(vec![product(1, "Kurta", "Kurta", "Lawn", "Red")]);
        assert!(suggest(&store, " k ", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggest_from_store() {
        let mut sold_out = product(2, "Khaddar Shawl", "Shawl", "Khaddar", "Brown");
        sold_out.in_stock = false;
        let store = MemoryProductStore::new(vec![
            product(1, "Khaddar Kurta", "Kurta", "Khaddar", "Brown"),
            sold_out,
        ]);

        assert_eq!(
            suggest(&store, "khad", 5).await.unwrap(),
            vec!["Khaddar Kurta", "khaddar kurta"]
        );
    }
}
