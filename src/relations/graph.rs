use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Strength given to links whose data carries no usable number.
pub const DEFAULT_STRENGTH: f32 = 5.0;

const MIN_STRENGTH: f32 = 1.0;
const MAX_STRENGTH: f32 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Protagonist,
    Antagonist,
    Supporting,
    Mentor,
    Sidekick,
    #[default]
    #[serde(other)]
    Other,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::Protagonist => "protagonist",
            Self::Antagonist => "antagonist",
            Self::Supporting => "supporting",
            Self::Mentor => "mentor",
            Self::Sidekick => "sidekick",
            Self::Other => "other",
        }
    }
}

/// A character as supplied by the data source. Relationship annotations live
/// under `extra.relationships` and are read leniently by the extractor.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub extra: Value,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            extra: Value::Null,
        }
    }

    pub fn with_relationships(mut self, relationships: Value) -> Self {
        self.extra = serde_json::json!({ "relationships": relationships });
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    #[default]
    Friend,
    Lover,
    Enemy,
}

impl LinkKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Friend => "friend",
            Self::Lover => "lover",
            Self::Enemy => "enemy",
        }
    }
}

/// Relation types used by the backend's structured relationship records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendRelation {
    Friendly,
    Romantic,
    Hostile,
    Family,
    Neutral,
}

const BACKEND_RELATIONS: [(&str, BackendRelation, LinkKind); 5] = [
    ("friendly", BackendRelation::Friendly, LinkKind::Friend),
    ("romantic", BackendRelation::Romantic, LinkKind::Lover),
    ("hostile", BackendRelation::Hostile, LinkKind::Enemy),
    ("family", BackendRelation::Family, LinkKind::Friend),
    ("neutral", BackendRelation::Neutral, LinkKind::Friend),
];

impl BackendRelation {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        BACKEND_RELATIONS
            .iter()
            .find(|(name, _, _)| name.eq_ignore_ascii_case(value))
            .map(|&(_, relation, _)| relation)
    }

    pub fn link_kind(self) -> LinkKind {
        BACKEND_RELATIONS
            .iter()
            .find(|(_, relation, _)| *relation == self)
            .map(|&(_, _, kind)| kind)
            .unwrap_or_default()
    }

    /// Unknown or missing relation names fall back to [`LinkKind::Friend`].
    pub fn link_kind_for(value: Option<&str>) -> LinkKind {
        value
            .and_then(Self::parse)
            .map(Self::link_kind)
            .unwrap_or_default()
    }
}

/// A typed relationship entry as stored by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct RelationshipRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "targetId", alias = "target")]
    pub target_id: String,
    #[serde(default, rename = "type", alias = "relationType", alias = "relation_type")]
    pub relation_type: Option<String>,
    #[serde(default)]
    pub strength: Option<f32>,
    #[serde(default, alias = "description")]
    pub label: Option<String>,
}

/// An undirected relationship edge between two characters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    #[serde(default = "default_strength")]
    pub strength: f32,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_strength() -> f32 {
    DEFAULT_STRENGTH
}

impl Link {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        kind: LinkKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            strength: DEFAULT_STRENGTH,
            label: None,
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Strength used for force weighting; anything outside `[1, 10]` counts as
    /// the default.
    pub fn effective_strength(&self) -> f32 {
        if self.strength.is_finite() && (MIN_STRENGTH..=MAX_STRENGTH).contains(&self.strength) {
            self.strength
        } else {
            DEFAULT_STRENGTH
        }
    }

    /// Order-independent key identifying the endpoint pair.
    pub fn pair_key(&self) -> (&str, &str) {
        pair_key(&self.source, &self.target)
    }
}

pub(crate) fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}
