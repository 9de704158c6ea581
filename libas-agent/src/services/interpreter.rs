// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Query interpretation: language-model extraction layered over the
//! deterministic vocabulary matcher.
//!
//! The model's reply is validated against a strict schema. Any transport,
//! parsing or schema failure degrades to the fallback extraction alone; the
//! completion call is never retried.

use crate::error::ExtractionError;
use crate::models::entities::{EntitySet, Gender};
use crate::services::completion::{CompletionClient, CompletionRequest};
use crate::services::fallback;
use crate::services::logging::preview;
use crate::services::vocabulary::{CATEGORIES, COLORS, FABRICS, STYLES};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

lazy_static! {
    /// First flat `{...}` object in a reply that may carry surrounding prose
    static ref JSON_OBJECT: Regex = Regex::new(r"\{[^{}]*\}").unwrap();

    static ref SYSTEM_PROMPT: String = format!(
        r#"You are a fashion product search assistant. Extract ALL relevant search parameters from user queries.

Extract these fields:
- color: ANY color mentioned (for example {colors})
- fabric: ANY fabric type (for example {fabrics})
- category: product type in singular form (for example {categories})
- gender: "Male" or "Female", only from the gender keywords below
- style: style keywords (for example {styles})
- min_price: minimum price if mentioned
- max_price: maximum price (from "under X", "below X", "less than X", "up to X", or a bare number)
- is_new: true if the query mentions "new", "latest", "fresh" or "recent"
- has_discount: true if the query mentions "sale", "discount", "offer" or "deal"

GENDER RULES:
1. "men", "mens", "men's", "man", "boy", "boys", "male", "gents" -> "Male"
2. "women", "womens", "women's", "woman", "girl", "girls", "female", "ladies" -> "Female"
3. Always extract gender when any gender keyword appears

OUTPUT RULES:
1. Return ONLY a single JSON object, no explanations
2. Omit any field the query does not mention; never guess
3. Use no field names other than the ones listed above
4. Match case-insensitively and map plurals to the singular (kurtas -> kurta)

Examples:
Query: "red silk kurta for women under 5000"
Output: {{"color":"red","fabric":"silk","category":"kurta","gender":"Female","max_price":5000}}

Query: "mens kurta"
Output: {{"category":"kurta","gender":"Male"}}

Query: "elegant black dress"
Output: {{"color":"black","category":"dress","style":"elegant"}}

Query: "men casual shirts under 3000"
Output: {{"gender":"Male","category":"shirt","style":"casual","max_price":3000}}

Query: "blue denim jeans for boys"
Output: {{"color":"blue","fabric":"denim","category":"jeans","gender":"Male"}}"#,
        colors = COLORS.join(", "),
        fabrics = FABRICS.join(", "),
        categories = CATEGORIES
            .iter()
            .map(|(singular, _)| *singular)
            .collect::<Vec<_>>()
            .join(", "),
        styles = STYLES.join(", "),
    );
}

/// Schema the model's JSON reply must satisfy
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelEntities {
    color: Option<String>,
    fabric: Option<String>,
    category: Option<String>,
    gender: Option<Gender>,
    style: Option<String>,
    #[serde(default, deserialize_with = "whole_price")]
    min_price: Option<u32>,
    #[serde(default, deserialize_with = "whole_price")]
    max_price: Option<u32>,
    is_new: Option<bool>,
    has_discount: Option<bool>,
}

impl From<ModelEntities> for EntitySet {
    fn from(m: ModelEntities) -> Self {
        EntitySet {
            color: normalize_term(m.color),
            fabric: normalize_term(m.fabric),
            category: normalize_term(m.category).map(singular_category),
            gender: m.gender,
            style: normalize_term(m.style),
            min_price: m.min_price,
            max_price: m.max_price,
            is_new: m.is_new,
            has_discount: m.has_discount,
        }
    }
}

/// Lower-case and trim a free-text attribute; blank values count as absent
fn normalize_term(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// Map a known plural category to its singular; other values pass through
fn singular_category(value: String) -> String {
    CATEGORIES
        .iter()
        .find(|(singular, plural)| value == *singular || value == *plural)
        .map_or(value, |(singular, _)| singular.to_string())
}

/// Accept JSON numbers with no fractional part, such as `5000` or `5000.0`
fn whole_price<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(D::Error::custom(format!(
            "price must be a non-negative whole number, got {value}"
        )));
    }
    Ok(Some(value as u32))
}

/// Parse a raw model reply into entities.
///
/// When the reply wraps the object in prose, the first flat brace-delimited
/// object is used.
fn parse_reply(reply: &str) -> Result<EntitySet, ExtractionError> {
    let json = JSON_OBJECT
        .find(reply)
        .ok_or(ExtractionError::NoJsonObject)?
        .as_str();
    let parsed: ModelEntities = serde_json::from_str(json)?;
    Ok(parsed.into())
}

/// Turns free-text queries into entity sets
#[derive(Clone)]
pub struct QueryInterpreter {
    completion: Option<Arc<dyn CompletionClient>>,
}

impl QueryInterpreter {
    /// Interpreter that consults the language model before the vocabularies
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            completion: Some(completion),
        }
    }

    /// Interpreter that only uses the deterministic vocabularies
    pub fn fallback_only() -> Self {
        Self { completion: None }
    }

    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Interpret `query`.
    ///
    /// Result is the fallback extraction overlaid with whatever the model
    /// returned; on any model failure it is the fallback extraction exactly.
    pub async fn interpret(&self, query: &str) -> EntitySet {
        let base = fallback::extract(query);

        let Some(completion) = &self.completion else {
            return base;
        };
        if query.trim().is_empty() {
            return base;
        }

        match self.extract_with_model(completion.as_ref(), query).await {
            Ok(model) => {
                tracing::debug!(?model, "Entities extracted by language model");
                base.overlay(model)
            }
            Err(e) => {
                tracing::warn!("Language-model extraction failed, using vocabulary matches: {e}");
                base
            }
        }
    }

    async fn extract_with_model(
        &self,
        completion: &dyn CompletionClient,
        query: &str,
    ) -> Result<EntitySet, ExtractionError> {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.clone(),
            user: format!("Extract attributes from: \"{}\"", query.trim()),
        };

        let reply = completion.complete(&request).await?;

        parse_reply(&reply).inspect_err(|_| {
            tracing::warn!(reply = %preview(&reply, 200), "Unusable completion reply");
        })
    }
}
