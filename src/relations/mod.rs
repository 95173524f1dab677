//! Relationship extraction: turns loosely structured character records into
//! a deduplicated, undirected link set.

mod classify;
mod error;
mod extract;
mod graph;
mod parse;
mod resolve;

pub use classify::{KeywordClassifier, RelationClassifier};
pub use error::RelationError;
pub use extract::{RelationshipExtractor, extract_relationships};
pub(crate) use extract::retain_known_endpoints;
pub use graph::{
    BackendRelation, Character, DEFAULT_STRENGTH, Link, LinkKind, RelationshipRecord, Role,
};
pub use parse::{Annotation, parse_annotation};
pub use resolve::{ContainmentResolver, FuzzyResolver, NameResolver};
