// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::entities::Gender;
use crate::models::search::{PageRange, DEFAULT_LIMIT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Value of the `is_new` column marking a product as a new arrival
pub const NOVELTY_MARKER: &str = "New";

/// A row of the `product_card` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub brand: String,
    /// Price in whole currency units
    pub price: i32,
    pub category: String,
    pub fabric: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    /// "Male" or "Female" when set
    pub gender: Option<String>,
    /// Novelty marker, `"New"` for new arrivals
    pub is_new: Option<String>,
    /// Discount percentage, 0 or absent when not on sale
    pub discount: Option<i32>,
    pub in_stock: bool,
    /// When the product was last ingested by the scraper
    pub scraped_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
}

impl ProductRecord {
    pub fn is_new_arrival(&self) -> bool {
        self.is_new.as_deref() == Some(NOVELTY_MARKER)
    }

    pub fn is_discounted(&self) -> bool {
        self.discount.is_some_and(|d| d > 0)
    }
}

/// Sorted distinct attribute values of in-stock products
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct FacetsResponse {
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub fabrics: Vec<String>,
    pub colors: Vec<String>,
}

/// Structured catalog filter, as used by the browse page.
///
/// Values within one list are alternatives; distinct criteria must all hold.
/// List values match the stored column exactly, as returned by `/facets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProductFilterRequest {
    /// Inclusive lower price bound
    pub min_price: Option<u32>,
    /// Inclusive upper price bound
    pub max_price: Option<u32>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub fabrics: Vec<String>,
    pub colors: Vec<String>,
    pub gender: Option<Gender>,
    /// Case-insensitive keyword matched against name, brand, category, fabric and color
    pub keyword: Option<String>,
    /// Maximum number of products to return (default: 20)
    pub limit: Option<u32>,
    /// Zero-based offset for pagination (default: 0)
    pub offset: Option<u32>,
}

impl ProductFilterRequest {
    pub fn page(&self) -> PageRange {
        PageRange::new(
            self.limit.unwrap_or(DEFAULT_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

/// Filtered products, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    /// Number of matching products before pagination
    pub total: u64,
    /// Number of products in this page
    pub returned: usize,
    pub products: Vec<ProductRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductRecord {
        ProductRecord {
            id: 1,
            name: "Embroidered Lawn Kurta".to_string(),
            brand: "Khaadi".to_string(),
            price: 4500,
            category: "Kurta".to_string(),
            fabric: Some("Lawn".to_string()),
            color: Some("Red".to_string()),
            style: None,
            gender: Some("Female".to_string()),
            is_new: None,
            discount: None,
            in_stock: true,
            scraped_at: Utc::now(),
            image_url: None,
            product_url: None,
        }
    }

    #[test]
    fn test_novelty_marker() {
        let mut p = product();
        assert!(!p.is_new_arrival());
        p.is_new = Some("New".to_string());
        assert!(p.is_new_arrival());
        p.is_new = Some("new".to_string());
        assert!(!p.is_new_arrival());
    }

    #[test]
    fn test_discount_requires_positive_value() {
        let mut p = product();
        assert!(!p.is_discounted());
        p.discount = Some(0);
        assert!(!p.is_discounted());
        p.discount = Some(20);
        assert!(p.is_discounted());
    }

    #[test]
    fn test_filter_request_defaults() {
        let request: ProductFilterRequest = serde_json::from_str(r#"{"brands": ["Khaadi"]}"#).unwrap();
        assert_eq!(request.brands, vec!["Khaadi"]);
        assert!(request.colors.is_empty());
        assert!(request.keyword.is_none());
        assert_eq!(request.page(), PageRange::new(20, 0));
    }
}
