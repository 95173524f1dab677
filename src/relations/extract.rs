use std::borrow::Cow;
use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::classify::{KeywordClassifier, RelationClassifier};
use super::error::RelationError;
use super::graph::{BackendRelation, Character, DEFAULT_STRENGTH, Link, RelationshipRecord};
use super::parse::parse_annotation;
use super::resolve::{ContainmentResolver, NameResolver};

const RELATIONSHIPS_KEY: &str = "relationships";

/// Builds an undirected link set from character records.
///
/// Each entry of `extra.relationships` is either a free-text annotation
/// (`"Name (relation)"`) or a structured record with an explicit target id.
/// Only the first link seen for an unordered character pair is kept.
pub struct RelationshipExtractor<C = KeywordClassifier, R = ContainmentResolver> {
    classifier: C,
    resolver: R,
}

impl Default for RelationshipExtractor {
    fn default() -> Self {
        Self::new(KeywordClassifier::default(), ContainmentResolver)
    }
}

/// Extraction with the default keyword classifier and containment resolver.
pub fn extract_relationships(characters: &[Character]) -> Vec<Link> {
    RelationshipExtractor::default().extract(characters)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn relationship_list<'v>(character: &Character, extra: &'v Value) -> Result<&'v [Value], RelationError> {
    let Value::Object(map) = extra else {
        return Err(RelationError::MalformedExtra {
            character: character.id.clone(),
            found: value_kind(extra),
        });
    };

    match map.get(RELATIONSHIPS_KEY) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(RelationError::MalformedList {
            character: character.id.clone(),
            found: value_kind(other),
        }),
    }
}

/// Suffixes `#2`, `#3`, ... onto an id that an earlier link already holds.
fn claim_link_id(id: String, used: &mut HashSet<String>) -> String {
    if used.insert(id.clone()) {
        return id;
    }
    let mut suffix = 2_usize;
    loop {
        let candidate = format!("{id}#{suffix}");
        if used.insert(candidate.clone()) {
            debug!(%id, renamed = %candidate, "link id already taken");
            return candidate;
        }
        suffix += 1;
    }
}

/// Some backends store `extra` as a JSON-encoded string; both forms are read.
fn relationship_entries(character: &Character) -> Result<Cow<'_, [Value]>, RelationError> {
    match &character.extra {
        Value::Null => Ok(Cow::Borrowed(&[])),
        Value::String(encoded) if encoded.trim().is_empty() => Ok(Cow::Borrowed(&[])),
        Value::String(encoded) => {
            let decoded = serde_json::from_str::<Value>(encoded).map_err(|source| {
                RelationError::UnreadableExtra {
                    character: character.id.clone(),
                    source,
                }
            })?;
            relationship_list(character, &decoded).map(|items| Cow::Owned(items.to_vec()))
        }
        other => relationship_list(character, other).map(Cow::Borrowed),
    }
}

impl<C, R> RelationshipExtractor<C, R>
where
    C: RelationClassifier,
    R: NameResolver,
{
    pub fn new(classifier: C, resolver: R) -> Self {
        Self {
            classifier,
            resolver,
        }
    }

    pub fn extract(&self, characters: &[Character]) -> Vec<Link> {
        let known_ids = characters
            .iter()
            .map(|character| character.id.as_str())
            .collect::<HashSet<_>>();
        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
        let mut used_ids: HashSet<String> = HashSet::new();
        let mut links = Vec::new();

        for source in characters {
            let entries = match relationship_entries(source) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(%error, "treating character as having no relationships");
                    continue;
                }
            };

            for (index, entry) in entries.iter().enumerate() {
                let link = match entry {
                    Value::String(annotation) => {
                        self.link_from_annotation(source, annotation, characters)
                    }
                    Value::Object(_) => Self::link_from_record(source, index, entry, &known_ids),
                    other => Err(RelationError::MalformedEntry {
                        character: source.id.clone(),
                        index,
                        reason: format!("expected a string or an object, found {}", value_kind(other)),
                    }),
                };

                match link {
                    Ok(mut link) => {
                        let (low, high) = link.pair_key();
                        if seen_pairs.insert((low.to_owned(), high.to_owned())) {
                            link.id = claim_link_id(link.id, &mut used_ids);
                            links.push(link);
                        }
                    }
                    Err(error) if error.is_malformed() => {
                        warn!(%error, "skipping relationship entry");
                    }
                    Err(error) => {
                        debug!(%error, "skipping relationship entry");
                    }
                }
            }
        }

        debug!(
            characters = characters.len(),
            links = links.len(),
            "extracted relationship links"
        );
        links
    }

    fn link_from_annotation(
        &self,
        source: &Character,
        annotation: &str,
        characters: &[Character],
    ) -> Result<Link, RelationError> {
        let parsed = parse_annotation(annotation).ok_or_else(|| RelationError::UnparsedAnnotation {
            character: source.id.clone(),
            annotation: annotation.to_owned(),
        })?;

        let target = self
            .resolver
            .resolve(parsed.name, characters, &source.id)
            .ok_or_else(|| RelationError::UnresolvedTarget {
                character: source.id.clone(),
                target: parsed.name.to_owned(),
            })?;

        let kind = self.classifier.classify(parsed.label);
        Ok(Link::new(format!("{}-{}", source.id, target.id), &source.id, &target.id, kind)
            .with_label(parsed.label))
    }

    fn link_from_record(
        source: &Character,
        index: usize,
        entry: &Value,
        known_ids: &HashSet<&str>,
    ) -> Result<Link, RelationError> {
        let record =
            RelationshipRecord::deserialize(entry).map_err(|error| RelationError::MalformedEntry {
                character: source.id.clone(),
                index,
                reason: error.to_string(),
            })?;

        if record.target_id == source.id {
            return Err(RelationError::SelfRelation {
                character: source.id.clone(),
            });
        }
        if !known_ids.contains(record.target_id.as_str()) {
            return Err(RelationError::DanglingTarget {
                character: source.id.clone(),
                target_id: record.target_id,
            });
        }

        let id = record
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{}-{}", source.id, record.target_id));

        Ok(Link {
            id,
            source: source.id.clone(),
            kind: BackendRelation::link_kind_for(record.relation_type.as_deref()),
            target: record.target_id,
            strength: record.strength.unwrap_or(DEFAULT_STRENGTH),
            label: record.label.filter(|label| !label.is_empty()),
        })
    }
}

/// Keeps only links whose endpoints both name a known node, logging the rest.
pub(crate) fn retain_known_endpoints<'a>(
    links: &'a [Link],
    known_ids: &HashSet<&str>,
) -> impl Iterator<Item = &'a Link> {
    links.iter().filter(move |link| {
        let known =
            known_ids.contains(link.source.as_str()) && known_ids.contains(link.target.as_str());
        if !known {
            warn!(
                link = %link.id,
                source = %link.source,
                target = %link.target,
                "dropping link with an unknown endpoint"
            );
        }
        known
    })
}
