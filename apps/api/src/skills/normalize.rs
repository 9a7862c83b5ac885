//! Skill-list normalization: case-insensitive dedup that keeps first-seen order and
//! spelling, known-skill filtering for recommendations, and a loose splitter for
//! model output that is a list but not JSON.

use indexmap::IndexMap;

/// Longest fragment the loose splitter accepts as a skill; longer pieces are prose.
const MAX_LOOSE_SKILL_LEN: usize = 60;

/// Comparison key for a skill label.
pub fn skill_key(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Ordered, case-insensitively unique set of skill labels.
#[derive(Debug, Clone, Default)]
pub struct SkillSet {
    entries: IndexMap<String, String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a trimmed label. Returns `false` for blanks and duplicates.
    pub fn insert(&mut self, skill: &str) -> bool {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            return false;
        }
        let key = skill_key(trimmed);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, trimmed.to_string());
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.entries.contains_key(&skill_key(skill))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries.into_values().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

/// Trim, drop blanks, dedupe case-insensitively, keep first-seen order.
pub fn normalize_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills.into_iter().collect::<SkillSet>().into_vec()
}

/// Drops candidates already in `known`, dedupes the rest, then caps at `cap`.
/// Model order is preserved.
pub fn exclude_known<I, S>(candidates: I, known: &SkillSet, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fresh = SkillSet::new();
    for candidate in candidates {
        if fresh.len() >= cap {
            break;
        }
        let candidate = candidate.as_ref();
        if !known.contains(candidate) {
            fresh.insert(candidate);
        }
    }
    fresh.into_vec()
}

/// Best-effort reading of a comma/newline separated list, e.g. `Python, SQL` or a
/// bulleted reply. Strips bullets, quotes and brackets around each item.
pub fn split_loose_list(text: &str) -> Vec<String> {
    let pieces = text
        .split([',', '\n', ';'])
        .map(|piece| {
            piece.trim().trim_matches(|c: char| {
                c.is_whitespace() || matches!(c, '"' | '\'' | '[' | ']' | '-' | '*' | '•' | '`')
            })
        })
        .filter(|piece| !piece.is_empty() && piece.chars().count() <= MAX_LOOSE_SKILL_LEN);
    normalize_skills(pieces)
}
