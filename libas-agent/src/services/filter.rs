// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Translation of an entity set or a structured filter into store predicates.
//!
//! A [`ProductFilter`] is plain data: the Postgres store renders it to SQL,
//! the in-memory store evaluates it row by row. Both must agree.

use crate::models::entities::{ordered_bounds, EntitySet};
use crate::models::product::{ProductFilterRequest, ProductRecord, NOVELTY_MARKER};
use sqlx::{Postgres, QueryBuilder};

/// Filterable text columns of `product_card`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Brand,
    Category,
    Fabric,
    Color,
    Style,
    Gender,
    IsNew,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Brand => "brand",
            Field::Category => "category",
            Field::Fabric => "fabric",
            Field::Color => "color",
            Field::Style => "style",
            Field::Gender => "gender",
            Field::IsNew => "is_new",
        }
    }

    pub fn value<'a>(&self, product: &'a ProductRecord) -> Option<&'a str> {
        match self {
            Field::Name => Some(&product.name),
            Field::Brand => Some(&product.brand),
            Field::Category => Some(&product.category),
            Field::Fabric => product.fabric.as_deref(),
            Field::Color => product.color.as_deref(),
            Field::Style => product.style.as_deref(),
            Field::Gender => product.gender.as_deref(),
            Field::IsNew => product.is_new.as_deref(),
        }
    }
}

/// Columns a browse keyword is matched against
const KEYWORD_FIELDS: [Field; 5] = [
    Field::Name,
    Field::Brand,
    Field::Category,
    Field::Fabric,
    Field::Color,
];

/// A single condition a product must satisfy
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    InStock,
    /// Exact, case-sensitive equality
    Equals(Field, String),
    /// Exact equality with any of the values
    OneOf(Field, Vec<String>),
    /// Case-insensitive substring match
    Contains(Field, String),
    /// Case-insensitive substring match on any of the fields
    AnyContains(Vec<Field>, String),
    PriceAtLeast(u32),
    PriceAtMost(u32),
    /// Discount strictly greater than zero
    Discounted,
}

impl Predicate {
    pub fn matches(&self, product: &ProductRecord) -> bool {
        match self {
            Predicate::InStock => product.in_stock,
            Predicate::Equals(field, value) => field.value(product) == Some(value.as_str()),
            Predicate::OneOf(field, values) => field
                .value(product)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
            Predicate::Contains(field, needle) => contains_ignore_case(field.value(product), needle),
            Predicate::AnyContains(fields, needle) => fields
                .iter()
                .any(|f| contains_ignore_case(f.value(product), needle)),
            Predicate::PriceAtLeast(min) => i64::from(product.price) >= i64::from(*min),
            Predicate::PriceAtMost(max) => i64::from(product.price) <= i64::from(*max),
            Predicate::Discounted => product.is_discounted(),
        }
    }

    fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::InStock => {
                builder.push("in_stock = TRUE");
            }
            Predicate::Equals(field, value) => {
                builder.push(field.column()).push(" = ").push_bind(value.clone());
            }
            Predicate::OneOf(field, values) => {
                builder
                    .push(field.column())
                    .push(" = ANY(")
                    .push_bind(values.clone())
                    .push(")");
            }
            Predicate::Contains(field, needle) => {
                builder
                    .push(field.column())
                    .push(" ILIKE ")
                    .push_bind(like_pattern(needle));
            }
            Predicate::AnyContains(fields, needle) => {
                builder.push("(");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    builder
                        .push(field.column())
                        .push(" ILIKE ")
                        .push_bind(like_pattern(needle));
                }
                builder.push(")");
            }
            Predicate::PriceAtLeast(min) => {
                builder.push("price >= ").push_bind(i64::from(*min));
            }
            Predicate::PriceAtMost(max) => {
                builder.push("price <= ").push_bind(i64::from(*max));
            }
            Predicate::Discounted => {
                builder.push("discount > 0");
            }
        }
    }
}

/// Conjunction of predicates over the product table
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub predicates: Vec<Predicate>,
}

impl ProductFilter {
    /// Filter matching every in-stock product
    pub fn in_stock() -> Self {
        Self {
            predicates: vec![Predicate::InStock],
        }
    }

    /// Build the predicates for an interpreted query
    pub fn from_entities(entities: &EntitySet) -> Self {
        let mut predicates = vec![Predicate::InStock];

        if let Some(gender) = entities.gender {
            predicates.push(Predicate::Equals(Field::Gender, gender.as_str().to_string()));
        }

        push_price_bounds(&mut predicates, entities.price_bounds());

        for (field, value) in [
            (Field::Color, &entities.color),
            (Field::Fabric, &entities.fabric),
            (Field::Category, &entities.category),
        ] {
            if let Some(value) = value {
                predicates.push(Predicate::Contains(field, value.clone()));
            }
        }

        // Style words mostly live in free text, not only the style column
        if let Some(style) = &entities.style {
            predicates.push(Predicate::AnyContains(
                vec![Field::Style, Field::Category, Field::Name],
                style.clone(),
            ));
        }

        if entities.is_new == Some(true) {
            predicates.push(Predicate::Equals(Field::IsNew, NOVELTY_MARKER.to_string()));
        }
        if entities.has_discount == Some(true) {
            predicates.push(Predicate::Discounted);
        }

        Self { predicates }
    }

    /// Build the predicates for a structured browse request.
    ///
    /// Blank list entries and a blank keyword are ignored.
    pub fn from_request(request: &ProductFilterRequest) -> Self {
        let mut predicates = vec![Predicate::InStock];

        push_price_bounds(
            &mut predicates,
            ordered_bounds(request.min_price, request.max_price),
        );

        for (field, values) in [
            (Field::Brand, &request.brands),
            (Field::Category, &request.categories),
            (Field::Fabric, &request.fabrics),
            (Field::Color, &request.colors),
        ] {
            let values: Vec<String> = values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            if !values.is_empty() {
                predicates.push(Predicate::OneOf(field, values));
            }
        }

        if let Some(gender) = request.gender {
            predicates.push(Predicate::Equals(Field::Gender, gender.as_str().to_string()));
        }

        if let Some(keyword) = request.keyword.as_deref().map(str::trim) {
            if !keyword.is_empty() {
                predicates.push(Predicate::AnyContains(
                    KEYWORD_FIELDS.to_vec(),
                    keyword.to_string(),
                ));
            }
        }

        Self { predicates }
    }

    pub fn matches(&self, product: &ProductRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(product))
    }

    /// Append ` WHERE ...` for the predicates to `builder`
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(builder);
        }
    }
}

fn push_price_bounds(predicates: &mut Vec<Predicate>, (min, max): (Option<u32>, Option<u32>)) {
    if let Some(min) = min {
        predicates.push(Predicate::PriceAtLeast(min));
    }
    if let Some(max) = max {
        predicates.push(Predicate::PriceAtMost(max));
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entities::Gender;
    use chrono::Utc;

    fn product() -> ProductRecord {
        ProductRecord {
            id: 7,
            name: "Festive Embroidered Kurta".to_string(),
            brand: "Sana Safinaz".to_string(),
            price: 4800,
            category: "Kurta".to_string(),
            fabric: Some("Raw Silk".to_string()),
            color: Some("Deep Red".to_string()),
            style: None,
            gender: Some("Female".to_string()),
            is_new: Some("New".to_string()),
            discount: Some(15),
            in_stock: true,
            scraped_at: Utc::now(),
            image_url: None,
            product_url: None,
        }
    }

    #[test]
    fn test_empty_entities_only_restrict_stock() {
        let filter = ProductFilter::from_entities(&EntitySet::default());
        assert_eq!(filter, ProductFilter::in_stock());
    }

    #[test]
    fn test_from_entities_builds_all_predicates() {
        let entities = EntitySet {
            color: Some("red".to_string()),
            fabric: Some("silk".to_string()),
            category: Some("kurta".to_string()),
            gender: Some(Gender::Female),
            style: Some("festive".to_string()),
            min_price: Some(1000),
            max_price: Some(5000),
            is_new: Some(true),
            has_discount: Some(true),
        };

        let filter = ProductFilter::from_entities(&entities);

        assert_eq!(
            filter.predicates,
            vec![
                Predicate::InStock,
                Predicate::Equals(Field::Gender, "Female".to_string()),
                Predicate::PriceAtLeast(1000),
                Predicate::PriceAtMost(5000),
                Predicate::Contains(Field::Color, "red".to_string()),
                Predicate::Contains(Field::Fabric, "silk".to_string()),
                Predicate::Contains(Field::Category, "kurta".to_string()),
                Predicate::AnyContains(
                    vec![Field::Style, Field::Category, Field::Name],
                    "festive".to_string()
                ),
                Predicate::Equals(Field::IsNew, "New".to_string()),
                Predicate::Discounted,
            ]
        );
        assert!(filter.matches(&product()));
    }

    #[test]
    fn test_false_flags_add_no_predicate() {
        let entities = EntitySet {
            is_new: Some(false),
            has_discount: Some(false),
            ..Default::default()
        };
        assert_eq!(ProductFilter::from_entities(&entities), ProductFilter::in_stock());
    }

    #[test]
    fn test_inverted_price_bounds_are_swapped() {
        let entities = EntitySet {
            min_price: Some(6000),
            max_price: Some(2000),
            ..Default::default()
        };
        let filter = ProductFilter::from_entities(&entities);
        assert!(filter.predicates.contains(&Predicate::PriceAtLeast(2000)));
        assert!(filter.predicates.contains(&Predicate::PriceAtMost(6000)));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let p = product();
        assert!(Predicate::PriceAtMost(4800).matches(&p));
        assert!(Predicate::PriceAtLeast(4800).matches(&p));
        assert!(!Predicate::PriceAtMost(4799).matches(&p));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let p = product();
        assert!(Predicate::Contains(Field::Color, "red".to_string()).matches(&p));
        assert!(Predicate::Contains(Field::Category, "KURTA".to_string()).matches(&p));
        assert!(!Predicate::Contains(Field::Style, "festive".to_string()).matches(&p));
    }

    #[test]
    fn test_style_matches_name_when_style_column_empty() {
        let p = product();
        let style = Predicate::AnyContains(
            vec![Field::Style, Field::Category, Field::Name],
            "embroidered".to_string(),
        );
        assert!(style.matches(&p));
    }

    #[test]
    fn test_gender_equality_is_exact() {
        let p = product();
        assert!(Predicate::Equals(Field::Gender, "Female".to_string()).matches(&p));
        assert!(!Predicate::Equals(Field::Gender, "female".to_string()).matches(&p));
    }

    #[test]
    fn test_out_of_stock_never_matches() {
        let mut p = product();
        p.in_stock = false;
        assert!(!ProductFilter::in_stock().matches(&p));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("red"), "%red%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_push_where_renders_bound_sql() {
        let entities = EntitySet {
            gender: Some(Gender::Male),
            max_price: Some(3000),
            style: Some("casual".to_string()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM product_card");
        ProductFilter::from_entities(&entities).push_where(&mut builder);

        assert_eq!(
            builder.sql(),
            "SELECT * FROM product_card WHERE in_stock = TRUE AND gender = $1 AND price <= $2 \
             AND (style ILIKE $3 OR category ILIKE $4 OR name ILIKE $5)"
        );
    }

    #[test]
    fn test_from_request_builds_predicates() {
        let request = ProductFilterRequest {
            min_price: Some(6000),
            max_price: Some(2000),
            brands: vec!["Khaadi".to_string(), " ".to_string(), "Sapphire".to_string()],
            colors: vec![],
            gender: Some(Gender::Female),
            keyword: Some(" silk ".to_string()),
            ..Default::default()
        };

        assert_eq!(
            ProductFilter::from_request(&request).predicates,
            vec![
                Predicate::InStock,
                Predicate::PriceAtLeast(2000),
                Predicate::PriceAtMost(6000),
                Predicate::OneOf(
                    Field::Brand,
                    vec!["Khaadi".to_string(), "Sapphire".to_string()]
                ),
                Predicate::Equals(Field::Gender, "Female".to_string()),
                Predicate::AnyContains(KEYWORD_FIELDS.to_vec(), "silk".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_request_only_restricts_stock() {
        let request = ProductFilterRequest {
            keyword: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(ProductFilter::from_request(&request), ProductFilter::in_stock());
    }

    #[test]
    fn test_one_of_is_exact() {
        let p = product();
        let brands = |names: &[&str]| {
            Predicate::OneOf(Field::Brand, names.iter().map(|n| n.to_string()).collect())
        };
        assert!(brands(&["Khaadi", "Sana Safinaz"]).matches(&p));
        assert!(!brands(&["sana safinaz"]).matches(&p));
        assert!(!brands(&["Sana"]).matches(&p));
        assert!(!Predicate::OneOf(Field::Style, vec!["Festive".to_string()]).matches(&p));
    }

    #[test]
    fn test_push_where_renders_value_lists() {
        let request = ProductFilterRequest {
            brands: vec!["Khaadi".to_string(), "Sapphire".to_string()],
            keyword: Some("lawn".to_string()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM product_card");
        ProductFilter::from_request(&request).push_where(&mut builder);

        assert_eq!(
            builder.sql(),
            "SELECT * FROM product_card WHERE in_stock = TRUE AND brand = ANY($1) \
             AND (name ILIKE $2 OR brand ILIKE $3 OR category ILIKE $4 OR fabric ILIKE $5 OR color ILIKE $6)"
        );
    }
}
