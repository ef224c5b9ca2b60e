use std::collections::{HashMap, HashSet};

use crate::models::rules::RuleModel;

/// Number of recommendations returned when the caller does not ask for a limit
pub const DEFAULT_LIMIT: usize = 10;

/// A candidate item with the best confidence seen for it so far
#[derive(Debug)]
struct Candidate<'a> {
    item: &'a str,
    confidence: f64,
    /// Position of the first rule that produced this candidate
    first_seen: usize,
}

/// Rank not-yet-liked consequents of every rule whose antecedent is fully
/// contained in `liked_items`.
///
/// A candidate produced by several rules keeps the highest confidence among
/// them. Equal confidences keep the order in which candidates were first
/// produced while walking the rules in stored order.
pub fn recommend(liked_items: &[String], model: &RuleModel, limit: usize) -> Vec<String> {
    if model.is_empty() || limit == 0 {
        return Vec::new();
    }

    let liked: HashSet<&str> = liked_items.iter().map(String::as_str).collect();

    let mut candidates: Vec<Candidate<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for rule in model.rules() {
        if !rule.antecedent.is_subset_of(&liked) {
            continue;
        }

        for item in rule.consequent.iter() {
            if liked.contains(item) {
                continue;
            }

            match index.get(item) {
                Some(&slot) => {
                    let candidate = &mut candidates[slot];
                    if rule.confidence > candidate.confidence {
                        candidate.confidence = rule.confidence;
                    }
                }
                None => {
                    index.insert(item, candidates.len());
                    candidates.push(Candidate {
                        item,
                        confidence: rule.confidence,
                        first_seen: candidates.len(),
                    });
                }
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then(a.first_seen.cmp(&b.first_seen))
    });

    candidates
        .into_iter()
        .take(limit)
        .map(|candidate| candidate.item.to_string())
        .collect()
}
