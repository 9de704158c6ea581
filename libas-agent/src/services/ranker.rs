// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Relevance ordering of an already-filtered result page.

use crate::models::entities::EntitySet;
use crate::models::product::ProductRecord;

const COLOR_WEIGHT: f32 = 3.0;
const FABRIC_WEIGHT: f32 = 3.0;
const CATEGORY_WEIGHT: f32 = 4.0;
const GENDER_WEIGHT: f32 = 2.0;
const STYLE_FIELD_WEIGHT: f32 = 2.0;
const STYLE_NAME_WEIGHT: f32 = 1.0;
const NOVELTY_WEIGHT: f32 = 0.5;
const DISCOUNT_WEIGHT: f32 = 0.5;

/// A record with its transient relevance annotation
#[derive(Debug)]
struct RankedResult {
    record: ProductRecord,
    score: f32,
    match_count: u32,
}

impl RankedResult {
    fn score(record: ProductRecord, entities: &EntitySet) -> Self {
        let mut ranked = Self {
            record,
            score: 0.0,
            match_count: 0,
        };

        let p = &ranked.record;
        let signals = [
            (field_contains(p.color.as_deref(), &entities.color), COLOR_WEIGHT),
            (field_contains(p.fabric.as_deref(), &entities.fabric), FABRIC_WEIGHT),
            (field_contains(Some(&p.category), &entities.category), CATEGORY_WEIGHT),
            (
                entities
                    .gender
                    .is_some_and(|g| p.gender.as_deref() == Some(g.as_str())),
                GENDER_WEIGHT,
            ),
            (field_contains(p.style.as_deref(), &entities.style), STYLE_FIELD_WEIGHT),
        ];
        let style_in_name = field_contains(Some(&p.name), &entities.style);
        let novelty = p.is_new_arrival();
        let discounted = p.is_discounted();

        for (matched, weight) in signals {
            if matched {
                ranked.score += weight;
                ranked.match_count += 1;
            }
        }
        if style_in_name {
            ranked.score += STYLE_NAME_WEIGHT;
        }
        if novelty {
            ranked.score += NOVELTY_WEIGHT;
        }
        if discounted {
            ranked.score += DISCOUNT_WEIGHT;
        }

        ranked
    }
}

fn field_contains(value: Option<&str>, wanted: &Option<String>) -> bool {
    match (value, wanted) {
        (Some(value), Some(wanted)) => value.to_lowercase().contains(&wanted.to_lowercase()),
        _ => false,
    }
}

/// Order `records` by relevance to `entities`, best first.
///
/// Records with equal scores keep their incoming order.
pub fn rank(records: Vec<ProductRecord>, entities: &EntitySet) -> Vec<ProductRecord> {
    let mut ranked: Vec<RankedResult> = records
        .into_iter()
        .map(|r| RankedResult::score(r, entities))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(top) = ranked.first() {
        tracing::debug!(
            id = top.record.id,
            score = top.score,
            matches = top.match_count,
            "Top ranked product"
        );
    }

    ranked.into_iter().map(|r| r.record).collect()
}
