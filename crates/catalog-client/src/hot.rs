//! Click-ranked "hot" product list

use crate::identity::identity_of;
use crate::types::Product;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Click counts keyed by product identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickStats {
    clicks: HashMap<String, f64>,
}

impl ClickStats {
    /// Parse a `field_stats` response of the form `{ "data": [{ "name", "value" }] }`
    ///
    /// Any other shape yields empty stats. Blank names are skipped, missing or
    /// non-numeric values count as zero, and later duplicates overwrite earlier ones.
    pub fn from_response(body: &Value) -> Self {
        let mut clicks = HashMap::new();
        let Some(items) = body.get("data").and_then(Value::as_array) else {
            return Self { clicks };
        };

        for item in items {
            let Some(id) = item.get("name").and_then(stat_name) else {
                continue;
            };
            let value = item.get("value").map_or(0.0, click_value);
            clicks.insert(id, value);
        }

        Self { clicks }
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.clicks.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.clicks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.clicks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ClickStats {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            clicks: iter.into_iter().map(|(id, n)| (id.into(), n)).collect(),
        }
    }
}

/// Rank `combined` listings by click statistics
///
/// Listings are grouped by identity, keeping only identities with stats. One
/// random member of each group is stamped with its click count and the picks
/// are sorted by clicks, most first. Listings without stats whose detail URL
/// was not picked follow in random order.
pub fn rank_hot_products<R: Rng + ?Sized>(
    combined: &[Product],
    stats: &ClickStats,
    rng: &mut R,
) -> Vec<Product> {
    let identities: Vec<Option<String>> = combined.iter().map(identity_of).collect();

    // Groups keep first-seen order so ties sort deterministically for a given rng
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Product>)> = Vec::new();
    for (product, id) in combined.iter().zip(&identities) {
        let Some(id) = id.as_deref().filter(|id| stats.contains(id)) else {
            continue;
        };
        match group_index.get(id) {
            Some(&idx) => groups[idx].1.push(product),
            None => {
                group_index.insert(id, groups.len());
                groups.push((id, vec![product]));
            }
        }
    }

    let mut selected: Vec<(f64, Product)> = groups
        .iter()
        .filter_map(|(id, members)| {
            let chosen = members.choose(&mut *rng)?;
            let clicks = stats.get(id).unwrap_or(0.0);
            Some((clicks, chosen.with_hot_clicks(clicks)))
        })
        .collect();
    selected.sort_by(|a, b| b.0.total_cmp(&a.0));

    let selected_urls: HashSet<&str> = selected
        .iter()
        .filter_map(|(_, p)| p.detail_url())
        .collect();

    let mut overflow: Vec<Product> = combined
        .iter()
        .zip(&identities)
        .filter(|(product, id)| {
            let Some(url) = product.detail_url() else {
                return false;
            };
            !selected_urls.contains(url) && !id.as_deref().is_some_and(|id| stats.contains(id))
        })
        .map(|(product, _)| product.clone())
        .collect();
    overflow.shuffle(rng);

    selected
        .into_iter()
        .map(|(_, product)| product)
        .chain(overflow)
        .collect()
}

fn stat_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!name.is_empty()).then_some(name)
}

fn click_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn listing(id: Option<&str>, url: &str) -> Product {
        let mut value = json!({ "spbt": "$1", "ztURL": "img", "spURL": url });
        if let Some(id) = id {
            value["id"] = json!(id);
        }
        serde_json::from_value(value).unwrap()
    }

    fn urls(products: &[Product]) -> Vec<&str> {
        products.iter().filter_map(Product::detail_url).collect()
    }

    #[test]
    fn test_click_stats_parsing() {
        let stats = ClickStats::from_response(&json!({
            "data": [
                { "name": " 111 ", "value": 10 },
                { "name": "222", "value": "7" },
                { "name": "333" },
                { "name": "444", "value": "lots" },
                { "name": "", "value": 99 },
                { "value": 5 },
                { "name": 555, "value": 3 },
                { "name": "111", "value": 12 }
            ]
        }));

        assert_eq!(stats.len(), 5);
        assert_eq!(stats.get("111"), Some(12.0));
        assert_eq!(stats.get("222"), Some(7.0));
        assert_eq!(stats.get("333"), Some(0.0));
        assert_eq!(stats.get("444"), Some(0.0));
        assert_eq!(stats.get("555"), Some(3.0));
    }

    #[test]
    fn test_click_stats_unexpected_shape_is_empty() {
        assert!(ClickStats::from_response(&json!([{ "name": "1", "value": 2 }])).is_empty());
        assert!(ClickStats::from_response(&json!({ "data": "nope" })).is_empty());
        assert!(ClickStats::from_response(&json!(null)).is_empty());
    }

    #[test]
    fn test_ranked_prefix_then_unmatched() {
        let stats: ClickStats = [("P1", 10.0), ("P2", 5.0)].into_iter().collect();
        let combined = vec![
            listing(Some("P2"), "https://shop.test/p2"),
            listing(None, "https://shop.test/plain-a"),
            listing(Some("P1"), "https://shop.test/p1"),
            listing(Some("P9"), "https://shop.test/p9"),
        ];

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ranked = rank_hot_products(&combined, &stats, &mut rng);

            assert_eq!(ranked.len(), 4);
            assert_eq!(urls(&ranked[..2]), vec!["https://shop.test/p1", "https://shop.test/p2"]);
            assert_eq!(ranked[0].hot_clicks(), Some(10.0));
            assert_eq!(ranked[1].hot_clicks(), Some(5.0));

            let mut tail = urls(&ranked[2..]);
            tail.sort();
            assert_eq!(tail, vec!["https://shop.test/p9", "https://shop.test/plain-a"]);
            assert!(ranked[2..].iter().all(|p| p.hot_clicks().is_none()));
        }
    }

    #[test]
    fn test_duplicate_identity_picks_one_member() {
        let stats: ClickStats = [("777777", 3.0)].into_iter().collect();
        let combined = vec![
            listing(None, "https://shop.test/a/777777"),
            listing(None, "https://shop.test/b/777777"),
            listing(None, "https://shop.test/c/777777"),
        ];

        let mut seen = HashSet::new();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ranked = rank_hot_products(&combined, &stats, &mut rng);

            // Members of a ranked group never reappear in the overflow
            assert_eq!(ranked.len(), 1);
            assert_eq!(ranked[0].hot_clicks(), Some(3.0));
            seen.insert(ranked[0].detail_url().unwrap().to_string());
        }
        assert!(seen.len() > 1, "selection should vary with the rng");
    }

    #[test]
    fn test_overflow_skips_selected_urls() {
        let stats: ClickStats = [("A", 1.0)].into_iter().collect();
        let combined = vec![
            listing(Some("A"), "https://shop.test/shared"),
            // Same page listed in another category without an id
            listing(None, "https://shop.test/shared"),
            listing(None, "https://shop.test/other"),
        ];

        let mut rng = StdRng::seed_from_u64(7);
        let ranked = rank_hot_products(&combined, &stats, &mut rng);
        assert_eq!(urls(&ranked), vec!["https://shop.test/shared", "https://shop.test/other"]);
    }

    #[test]
    fn test_same_seed_same_order() {
        let stats = ClickStats::default();
        let combined: Vec<Product> = (0..10)
            .map(|i| listing(None, &format!("https://shop.test/{i}")))
            .collect();

        let first = rank_hot_products(&combined, &stats, &mut StdRng::seed_from_u64(42));
        let second = rank_hot_products(&combined, &stats, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }

    #[test]
    fn test_no_overlap_yields_only_overflow() {
        let stats: ClickStats = [("X", 9.0)].into_iter().collect();
        let combined = vec![listing(Some("Y"), "https://shop.test/y")];

        let ranked = rank_hot_products(&combined, &stats, &mut StdRng::seed_from_u64(1));
        assert_eq!(urls(&ranked), vec!["https://shop.test/y"]);
    }

    #[test]
    fn test_empty_input() {
        let stats: ClickStats = [("X", 9.0)].into_iter().collect();
        let ranked = rank_hot_products(&[], &stats, &mut StdRng::seed_from_u64(1));
        assert!(ranked.is_empty());
    }
}
