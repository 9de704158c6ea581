// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Read-only access to the product catalog.

use crate::error::StoreError;
use crate::models::product::{FacetsResponse, ProductRecord};
use crate::models::search::PageRange;
use crate::services::filter::ProductFilter;
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, QueryBuilder};
use std::collections::BTreeSet;
use std::path::Path;

const PRODUCT_COLUMNS: &str = "id, name, brand, price, category, fabric, color, style, gender, \
     is_new, discount, in_stock, scraped_at, image_url, product_url";

/// One page of a filtered product query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    /// Products in store order: most recently ingested first
    pub products: Vec<ProductRecord>,
    /// Number of matching products before pagination
    pub total: u64,
}

/// Queryable product collection
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Products matching `filter`, newest first, windowed by `page`
    async fn find_products(
        &self,
        filter: &ProductFilter,
        page: PageRange,
    ) -> Result<ProductPage, StoreError>;

    /// A single in-stock product
    async fn get_product(&self, id: i64) -> Result<Option<ProductRecord>, StoreError>;

    /// Distinct attribute values of in-stock products
    async fn facets(&self) -> Result<FacetsResponse, StoreError>;
}

// ─── Postgres ────────────────────────────────────────────

/// Product store backed by the `product_card` table
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, filter: &ProductFilter) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM product_card");
        filter.push_where(&mut builder);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn distinct_values(&self, column: &'static str) -> Result<Vec<String>, StoreError> {
        let sql = format!(
            "SELECT DISTINCT {column} FROM product_card \
             WHERE in_stock = TRUE AND {column} IS NOT NULL AND {column} <> '' \
             ORDER BY {column}"
        );
        let values = sqlx::query_scalar::<_, String>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(values)
    }
}

/// `SELECT` for one page of products matching `filter`
fn select_page(filter: &ProductFilter, page: PageRange) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM product_card"));
    filter.push_where(&mut builder);
    builder
        .push(" ORDER BY scraped_at DESC, id DESC LIMIT ")
        .push_bind(i64::from(page.limit))
        .push(" OFFSET ")
        .push_bind(i64::from(page.offset));
    builder
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_products(
        &self,
        filter: &ProductFilter,
        page: PageRange,
    ) -> Result<ProductPage, StoreError> {
        let mut select = select_page(filter, page);
        let rows = select
            .build_query_as::<ProductRecord>()
            .fetch_all(&self.pool);

        let (products, total) = futures::try_join!(
            async { rows.await.map_err(StoreError::from) },
            self.count(filter)
        )?;

        Ok(ProductPage { products, total })
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductRecord>, StoreError> {
        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM product_card WHERE id = $1 AND in_stock = TRUE");
        let product = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn facets(&self) -> Result<FacetsResponse, StoreError> {
        let (brands, categories, fabrics, colors) = futures::try_join!(
            self.distinct_values("brand"),
            self.distinct_values("category"),
            self.distinct_values("fabric"),
            self.distinct_values("color"),
        )?;

        Ok(FacetsResponse {
            brands,
            categories,
            fabrics,
            colors,
        })
    }
}

// ─── In-memory ───────────────────────────────────────────

/// Product store over a fixed list of records.
///
/// Evaluates [`ProductFilter`] predicates directly; used for local runs
/// from a JSON fixture and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryProductStore {
    products: Vec<ProductRecord>,
}

impl MemoryProductStore {
    pub fn new(mut products: Vec<ProductRecord>) -> Self {
        products.sort_by(|a, b| b.scraped_at.cmp(&a.scraped_at).then(b.id.cmp(&a.id)));
        Self { products }
    }

    /// Load products from a JSON array of records
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        let products: Vec<ProductRecord> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::InvalidRecord(format!("{}: {e}", path.display())))?;
        Ok(Self::new(products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_products(
        &self,
        filter: &ProductFilter,
        page: PageRange,
    ) -> Result<ProductPage, StoreError> {
        let matching: Vec<&ProductRecord> =
            self.products.iter().filter(|p| filter.matches(p)).collect();

        let first = page.offset as usize;
        let last = page.last_index() as usize;
        let products = matching
            .iter()
            .enumerate()
            .filter(|(i, _)| (first..=last).contains(i))
            .map(|(_, p)| (*p).clone())
            .collect();

        Ok(ProductPage {
            products,
            total: matching.len() as u64,
        })
    }

    async fn get_product(&self, id: i64) -> Result<Option<ProductRecord>, StoreError> {
        Ok(self
            .products
            .iter()
            .find(|p| p.id == id && p.in_stock)
            .cloned())
    }

    async fn facets(&self) -> Result<FacetsResponse, StoreError> {
        let in_stock = || self.products.iter().filter(|p| p.in_stock);

        Ok(FacetsResponse {
            brands: distinct(in_stock().map(|p| Some(p.brand.as_str()))),
            categories: distinct(in_stock().map(|p| Some(p.category.as_str()))),
            fabrics: distinct(in_stock().map(|p| p.fabric.as_deref())),
            colors: distinct(in_stock().map(|p| p.color.as_deref())),
        })
    }
}
