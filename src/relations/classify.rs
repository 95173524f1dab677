use serde::Deserialize;

use super::graph::LinkKind;

/// Reduces a free-text relation label to one of the three link kinds.
pub trait RelationClassifier {
    fn classify(&self, label: &str) -> LinkKind;
}

impl<F> RelationClassifier for F
where
    F: Fn(&str) -> LinkKind,
{
    fn classify(&self, label: &str) -> LinkKind {
        self(label)
    }
}

/// Keyword matching over the lowercased label. Hostility wins over romance;
/// everything unmatched is a friend.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct KeywordClassifier {
    pub hostility: Vec<String>,
    pub romance: Vec<String>,
}

const HOSTILITY_KEYWORDS: &[&str] = &[
    "enemy", "enemies", "rival", "nemesis", "foe", "hostile", "hatred", "betray", "opponent",
    "adversary", "敌", "仇", "对手", "对立",
];

const ROMANCE_KEYWORDS: &[&str] = &[
    "lover", "love", "romantic", "romance", "spouse", "wife", "husband", "fiance", "fiancé",
    "girlfriend", "boyfriend", "sweetheart", "crush", "恋", "爱", "夫", "妻", "情侣",
];

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            hostility: HOSTILITY_KEYWORDS.iter().map(|&word| word.to_owned()).collect(),
            romance: ROMANCE_KEYWORDS.iter().map(|&word| word.to_owned()).collect(),
        }
    }
}

impl KeywordClassifier {
    fn matches(keywords: &[String], label: &str) -> bool {
        keywords
            .iter()
            .filter(|keyword| !keyword.is_empty())
            .any(|keyword| label.contains(&keyword.to_lowercase()))
    }
}

impl RelationClassifier for KeywordClassifier {
    fn classify(&self, label: &str) -> LinkKind {
        let label = label.to_lowercase();
        if Self::matches(&self.hostility, &label) {
            LinkKind::Enemy
        } else if Self::matches(&self.romance, &label) {
            LinkKind::Lover
        } else {
            LinkKind::Friend
        }
    }
}
