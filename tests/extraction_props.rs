use std::collections::HashSet;

use character_graph::interaction::PointerId;
use character_graph::relations::{Character, Role, extract_relationships};
use character_graph::sim::{Node, Simulation, SimulationConfig};
use proptest::prelude::*;
use serde_json::{Value, json};

const NAMES: &[&str] = &["Aria", "Bren", "Cato", "Dorian", "Elka", "Fenwick"];
const LABELS: &[&str] = &["friend", "lover", "sworn enemy", "mentor", "rival", "妻子", "old ally"];
const BACKEND_TYPES: &[&str] = &["friendly", "romantic", "hostile", "family", "neutral", "unknown"];

/// One relationship entry: target index, label index, and whether it is a
/// structured record instead of a free-text annotation.
type EntrySeed = (usize, usize, bool);

fn entry(seed: EntrySeed) -> Value {
    let (target, label, structured) = seed;
    if structured {
        json!({
            "targetId": format!("c{target}"),
            "type": BACKEND_TYPES[label % BACKEND_TYPES.len()],
            "strength": (label + 1) as f32,
        })
    } else {
        Value::String(format!("{} ({})", NAMES[target], LABELS[label]))
    }
}

fn cast_strategy() -> impl Strategy<Value = Vec<Character>> {
    let seed = (0..NAMES.len(), 0..LABELS.len(), any::<bool>());
    prop::collection::vec(prop::collection::vec(seed, 0..6), 1..=NAMES.len()).prop_map(
        |per_character| {
            per_character
                .into_iter()
                .enumerate()
                .map(|(index, entries)| {
                    Character::new(format!("c{index}"), NAMES[index], Role::Other)
                        .with_relationships(Value::Array(entries.into_iter().map(entry).collect()))
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn extraction_is_deterministic(cast in cast_strategy()) {
        prop_assert_eq!(extract_relationships(&cast), extract_relationships(&cast));
    }

    #[test]
    fn extracted_links_have_unique_pairs_ids_and_known_endpoints(cast in cast_strategy()) {
        let ids = cast.iter().map(|character| character.id.as_str()).collect::<HashSet<_>>();
        let links = extract_relationships(&cast);

        let mut pairs = HashSet::new();
        let mut link_ids = HashSet::new();
        for link in &links {
            prop_assert!(link_ids.insert(link.id.as_str()), "duplicate id {}", link.id);
            prop_assert!(link.source != link.target);
            prop_assert!(ids.contains(link.source.as_str()));
            prop_assert!(ids.contains(link.target.as_str()));
            prop_assert!(pairs.insert(link.pair_key()), "duplicate pair {:?}", link.pair_key());
        }
    }

    #[test]
    fn pinned_node_reports_pin_exactly(
        cast in cast_strategy(),
        x in -500.0f32..1500.0,
        y in -500.0f32..1500.0,
    ) {
        let links = extract_relationships(&cast);
        let nodes = cast.iter().map(Node::from).collect::<Vec<_>>();
        let mut simulation = Simulation::new(&nodes, &links, 800.0, 600.0, SimulationConfig::default());

        let controller = simulation.controller();
        controller.drag_start(PointerId(0), "c0");
        controller.drag_move(PointerId(0), x, y);
        simulation.tick();

        let snapshot = simulation.snapshot();
        let pinned = snapshot.node("c0").unwrap();
        prop_assert_eq!((pinned.x, pinned.y), (x, y));
        prop_assert!(snapshot.nodes.iter().all(|node| node.x.is_finite() && node.y.is_finite()));
    }
}
