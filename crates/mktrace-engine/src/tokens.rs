use std::collections::HashSet;

/// Drops empty tokens, keeping order.
pub fn remove_empty(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect()
}

/// Drops repeated tokens, keeping the first occurrence of each.
pub fn dedup_keep_first(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
