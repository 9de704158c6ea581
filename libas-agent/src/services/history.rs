// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Search tracking and popular-search statistics.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgPool;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Returned while there is not enough recent history
pub const DEFAULT_POPULAR_SEARCHES: [&str; 3] = [
    "embroidered lawn suit",
    "blue silk kurta",
    "bridal lehenga under 10000",
];

/// Only searches this recent count towards popularity
pub const POPULAR_WINDOW_DAYS: i64 = 30;

/// Append-only log of search queries
#[async_trait]
pub trait SearchHistory: Send + Sync {
    /// Store an already normalized query
    async fn record(&self, query: &str) -> Result<(), StoreError>;

    /// Most frequent queries since `since`, most frequent first.
    /// Equally frequent queries are ordered by most recent use.
    async fn top_queries(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<String>, StoreError>;
}

/// Trim and lower-case a query for tracking; blank queries are not tracked
pub fn normalize_query(query: &str) -> Option<String> {
    let query = query.trim();
    (!query.is_empty()).then(|| query.to_lowercase())
}

/// Record `query` if it is worth tracking. Failures are logged only.
pub async fn track_search(history: &dyn SearchHistory, query: &str) {
    let Some(query) = normalize_query(query) else {
        return;
    };
    if let Err(e) = history.record(&query).await {
        tracing::warn!("Failed to track search: {e}");
    }
}

/// Most popular recent queries, or the fixed defaults when fewer than
/// `limit` distinct queries were searched recently.
pub async fn popular_searches(history: &dyn SearchHistory, limit: u32) -> Vec<String> {
    let since = Utc::now() - Duration::days(POPULAR_WINDOW_DAYS);
    match history.top_queries(since, limit).await {
        Ok(top) => popular_or_default(top, limit),
        Err(e) => {
            tracing::warn!("Failed to load popular searches: {e}");
            default_popular()
        }
    }
}

fn popular_or_default(top: Vec<String>, limit: u32) -> Vec<String> {
    if top.is_empty() || top.len() < limit as usize {
        default_popular()
    } else {
        top
    }
}

fn default_popular() -> Vec<String> {
    DEFAULT_POPULAR_SEARCHES.iter().map(|q| q.to_string()).collect()
}

// ─── Postgres ────────────────────────────────────────────

/// History backed by the `search_history` table
#[derive(Clone)]
pub struct PgSearchHistory {
    pool: PgPool,
}

impl PgSearchHistory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchHistory for PgSearchHistory {
    async fn record(&self, query: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO search_history (id, query, searched_at) VALUES ($1, $2, $3)")
            .bind(Uuid::now_v7())
            .bind(query)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn top_queries(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<String>, StoreError> {
        let queries = sqlx::query_scalar::<_, String>(
            "SELECT query FROM search_history
             WHERE searched_at >= $1
             GROUP BY query
             ORDER BY COUNT(*) DESC, MAX(searched_at) DESC
             LIMIT $2",
        )
        .bind(since)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(queries)
    }
}

// ─── In-memory ───────────────────────────────────────────

/// History kept in process memory, for local runs and tests
#[derive(Default)]
pub struct MemorySearchHistory {
    entries: Mutex<Vec<(String, DateTime<Utc>)>>,
}

impl MemorySearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_at(&self, query: &str, searched_at: DateTime<Utc>) {
        self.entries
            .lock()
            .await
            .push((query.to_string(), searched_at));
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl SearchHistory for MemorySearchHistory {
    async fn record(&self, query: &str) -> Result<(), StoreError> {
        self.record_at(query, Utc::now()).await;
        Ok(())
    }

    async fn top_queries(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.lock().await;

        let mut stats: HashMap<&str, (usize, DateTime<Utc>)> = HashMap::new();
        for (query, at) in entries.iter().filter(|(_, at)| *at >= since) {
            let entry = stats.entry(query.as_str()).or_insert((0, *at));
            entry.0 += 1;
            entry.1 = entry.1.max(*at);
        }

        let mut ranked: Vec<_> = stats.into_iter().collect();
        ranked.sort_by(|(_, (count_a, last_a)), (_, (count_b, last_b))| {
            count_b.cmp(count_a).then(last_b.cmp(last_a))
        });

        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(query, _)| query.to_string())
            .collect())
    }
}
