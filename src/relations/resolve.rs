use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::graph::Character;

/// Maps a free-text name onto one of the known characters.
///
/// `exclude_id` is the character the annotation belongs to; it is never a
/// candidate.
pub trait NameResolver {
    fn resolve<'c>(
        &self,
        name: &str,
        candidates: &'c [Character],
        exclude_id: &str,
    ) -> Option<&'c Character>;
}

/// Substring containment in either direction, then a first-token retry.
/// The first candidate in input order wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContainmentResolver;

impl ContainmentResolver {
    fn contains_either<'c>(
        name: &str,
        candidates: &'c [Character],
        exclude_id: &str,
    ) -> Option<&'c Character> {
        candidates.iter().find(|candidate| {
            candidate.id != exclude_id
                && !candidate.name.is_empty()
                && (candidate.name.contains(name) || name.contains(candidate.name.as_str()))
        })
    }
}

impl NameResolver for ContainmentResolver {
    fn resolve<'c>(
        &self,
        name: &str,
        candidates: &'c [Character],
        exclude_id: &str,
    ) -> Option<&'c Character> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        if let Some(found) = Self::contains_either(name, candidates, exclude_id) {
            return Some(found);
        }

        let first_token = name.split_whitespace().next()?;
        if first_token == name {
            return None;
        }
        Self::contains_either(first_token, candidates, exclude_id)
    }
}

/// Containment first; when that fails, the best skim score across candidate
/// names. Ties keep the earliest candidate.
#[derive(Default)]
pub struct FuzzyResolver {
    matcher: SkimMatcherV2,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl NameResolver for FuzzyResolver {
    fn resolve<'c>(
        &self,
        name: &str,
        candidates: &'c [Character],
        exclude_id: &str,
    ) -> Option<&'c Character> {
        if let Some(found) = ContainmentResolver.resolve(name, candidates, exclude_id) {
            return Some(found);
        }

        let query = name.trim();
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(i64, &'c Character)> = None;
        for candidate in candidates.iter().filter(|candidate| candidate.id != exclude_id) {
            let Some(score) = fuzzy_match_score(&self.matcher, &candidate.name, query) else {
                continue;
            };
            if best.is_none_or(|(best_score, _)| score > best_score) {
                best = Some((score, candidate));
            }
        }
        best.map(|(_, candidate)| candidate)
    }
}
