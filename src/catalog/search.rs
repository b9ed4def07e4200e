//! Relevance-ranked model search over a model catalog

use super::Catalog;
use crate::model::ModelConfig;
use serde::Serialize;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Release year assumed for models without a release date
const UNDATED_RELEASE_YEAR: u32 = 2020;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSearchHit {
    pub name: String,
    pub display_name: String,
    pub family: Option<String>,
    pub size: Option<String>,
    pub release_date: Option<String>,
    pub score: u32,
}

/// Search models by name, family and size label.
///
/// Scores are additive: exact name 100, name prefix 50, name substring 20,
/// family 15, size 10, popular (>1000 downloads) 5, released 2024+ 8 or
/// 2023 5. Matches with a positive score are returned best first.
pub fn search_models(
    catalog: &Catalog<ModelConfig>,
    query: &str,
    limit: usize,
) -> Vec<ModelSearchHit> {
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();

    let mut hits: Vec<ModelSearchHit> = catalog
        .iter()
        .filter_map(|(name, config)| {
            let score = relevance(name, config, &query);
            (score > 0).then(|| ModelSearchHit {
                name: name.to_string(),
                display_name: display_name(name, config),
                family: config.family.clone(),
                size: config.size_category_for(name),
                release_date: config.release_date.clone(),
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);
    hits
}

fn relevance(name: &str, config: &ModelConfig, query: &str) -> u32 {
    let name_lower = name.to_lowercase();
    let mut score = 0;

    if name_lower == query {
        score += 100;
    }
    if name_lower.starts_with(query) {
        score += 50;
    }
    if name_lower.contains(query) {
        score += 20;
    }
    if contains_lower(config.family.as_deref(), query) {
        score += 15;
    }
    if contains_lower(config.size_category.as_deref(), query) {
        score += 10;
    }

    // popularity and recency only boost, they cannot make a match on their own
    if score == 0 {
        return 0;
    }
    if config.downloads.unwrap_or(0) > 1000 {
        score += 5;
    }
    let year = config.release_year().unwrap_or(UNDATED_RELEASE_YEAR);
    if year >= 2024 {
        score += 8;
    } else if year >= 2023 {
        score += 5;
    }
    score
}

fn contains_lower(field: Option<&str>, query: &str) -> bool {
    field.map(|f| f.to_lowercase().contains(query)).unwrap_or(false)
}

/// `"{family} {size} ({org})"` when both are known, else `"{basename} ({org})"`
pub fn display_name(name: &str, config: &ModelConfig) -> String {
    let org = name.split('/').next().unwrap_or(name);
    let base = name.rsplit('/').next().unwrap_or(name);

    match (config.family.as_deref(), config.size_category.as_deref()) {
        (Some(family), Some(size)) if !family.is_empty() && !size.is_empty() => {
            format!("{} {} ({})", family, size, org)
        }
        _ => format!("{} ({})", base, org),
    }
}
