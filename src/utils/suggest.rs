//! "Did you mean" ranking for unknown tool names.

fn normalize(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn score(input: &str, candidate: &str) -> Option<usize> {
    if input.is_empty() || candidate.is_empty() {
        return None;
    }
    if input == candidate {
        return Some(0);
    }
    if candidate.contains(input) || input.contains(candidate) {
        return Some(1);
    }
    let allowed = match input.len() {
        0..=4 => 1,
        5..=8 => 2,
        len => (len * 35 / 100).max(3),
    };
    let distance = edit_distance(input, candidate);
    (distance <= allowed).then_some(distance)
}

/// Closest known names to `input`, best first, at most `limit` of them.
pub fn suggest<'a>(input: &str, candidates: &[&'a str], limit: usize) -> Vec<&'a str> {
    let needle = normalize(input);
    let mut scored: Vec<(&'a str, usize)> = candidates
        .iter()
        .filter_map(|candidate| score(&needle, &normalize(candidate)).map(|s| (*candidate, s)))
        .collect();

    scored.sort_by(|a, b| {
        a.1.cmp(&b.1)
            .then_with(|| a.0.len().cmp(&b.0.len()))
            .then_with(|| a.0.cmp(b.0))
    });
    scored.dedup_by(|a, b| a.0 == b.0);
    scored.into_iter().take(limit.max(1)).map(|(name, _)| name).collect()
}
