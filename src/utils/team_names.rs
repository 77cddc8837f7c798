use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

use super::team_aliases::TEAM_ALIASES;

/// Club-type tokens dropped from either end of a name ("FC Porto", "Chelsea FC", "1. FC Köln")
const CLUB_AFFIXES: &[&str] = &[
    "fc", "cf", "sc", "ac", "afc", "ssc", "rc", "rcd", "cd", "ud", "sd", "as", "us", "ss", "sl",
    "fk", "nk", "sk", "bk", "if", "ff", "gf", "ik", "tk", "pk", "jk", "hk", "mk", "ok", "rk", "vk",
    "ms", "ks", "1.",
];

/// Default threshold for `is_match`
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.75;

/// Cleaned alias (and canonical) spelling -> canonical name.
/// Canonical names are inserted first so they always resolve to themselves.
static ALIAS_LOOKUP: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut lookup = HashMap::new();
    for (canonical, _) in TEAM_ALIASES {
        lookup.insert(clean(canonical), *canonical);
    }
    for (canonical, aliases) in TEAM_ALIASES {
        for alias in aliases.iter() {
            lookup.entry(clean(alias)).or_insert(*canonical);
        }
    }
    lookup
});

/// Resolves club name spellings to a canonical form and scores how alike two names are
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher {
    aliases: &'static HashMap<String, &'static str>,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl NameMatcher {
    pub fn new() -> Self {
        Self {
            aliases: &ALIAS_LOOKUP,
        }
    }

    /// Canonical form of a club name. Idempotent: `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(&self, name: &str) -> String {
        let cleaned = clean(name);
        if let Some(canonical) = self.aliases.get(&cleaned) {
            return canonical.to_string();
        }
        let compact = cleaned.replace(' ', "");
        if let Some(canonical) = self.aliases.get(&compact) {
            return canonical.to_string();
        }
        cleaned
    }

    /// Similarity in [0, 1]. Symmetric, and 1.0 for a name compared with itself.
    ///
    /// Checks run in order and the first hit wins:
    /// exact match, containment, shared significant words, shared 4-letter prefix,
    /// then a character-level sequence ratio.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let n1 = self.normalize(a);
        let n2 = self.normalize(b);

        if n1 == n2 {
            return 1.0;
        }
        if n1.is_empty() || n2.is_empty() {
            return 0.0;
        }

        let c1 = n1.replace(' ', "");
        let c2 = n2.replace(' ', "");
        if c1 == c2 {
            return 1.0;
        }

        if n1.contains(&n2) || n2.contains(&n1) {
            return 0.92;
        }
        if c1.contains(&c2) || c2.contains(&c1) {
            return 0.90;
        }

        // significant words, deduplicated per name
        let long1: BTreeSet<&str> = n1
            .split_whitespace()
            .filter(|w| w.chars().count() >= 4)
            .collect();
        let long2: BTreeSet<&str> = n2
            .split_whitespace()
            .filter(|w| w.chars().count() >= 4)
            .collect();

        let shared = long1.intersection(&long2).count();
        if shared > 0 {
            return (0.80 + 0.04 * shared as f64).min(0.88);
        }

        for w1 in &long1 {
            for w2 in &long2 {
                if w1.chars().take(4).eq(w2.chars().take(4)) {
                    return 0.82;
                }
            }
        }

        sequence_ratio(&n1, &n2).max(sequence_ratio(&c1, &c2))
    }

    pub fn is_match(&self, a: &str, b: &str, threshold: f64) -> bool {
        self.similarity(a, b) >= threshold
    }
}

/// Lowercase and strip decorations, repeated until nothing changes
fn clean(name: &str) -> String {
    let mut current = clean_once(name);
    for _ in 0..4 {
        let next = clean_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_once(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = strip_affixes(&lowered);
    let stripped = strip_parentheticals(&stripped);
    let stripped = stripped.trim_end_matches(|c: char| c == '-' || c.is_whitespace());
    collapse_whitespace(&strip_punctuation(stripped))
}

fn strip_affixes(name: &str) -> String {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    while tokens.len() > 1 && CLUB_AFFIXES.contains(&tokens[0]) {
        tokens.remove(0);
    }
    while tokens.len() > 1 && tokens.last().is_some_and(|t| CLUB_AFFIXES.contains(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

fn strip_parentheticals(name: &str) -> String {
    let mut out = name.to_string();
    while let Some(open) = out.find('(') {
        match out[open..].find(')') {
            Some(close) => out.replace_range(open..open + close + 1, " "),
            None => break,
        }
    }
    out
}

fn strip_punctuation(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            '\'' | '.' | '-' | '"' | '(' | ')' => None,
            c if c.is_alphanumeric() || c == '_' || c.is_whitespace() => Some(c),
            _ => Some(' '),
        })
        .collect()
}

fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 2 * LCS(a, b) / (|a| + |b|) over characters
fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b.len()];

    2.0 * lcs as f64 / (a.len() + b.len()) as f64
}
