use character_graph::interaction::PointerId;
use character_graph::relations::{Character, Link, LinkKind, Role, extract_relationships};
use character_graph::sim::{Node, Simulation, SimulationConfig, SimulationState};
use serde_json::json;

fn cast() -> Vec<Character> {
    vec![
        Character::new("a", "A", Role::Other).with_relationships(json!([
            { "id": "l1", "targetId": "b", "type": "friendly", "strength": 8 }
        ])),
        Character::new("b", "B", Role::Other).with_relationships(json!([
            { "id": "l2", "targetId": "c", "type": "friendly", "strength": 2 }
        ])),
        Character::new("c", "C", Role::Other),
    ]
}

fn nodes(characters: &[Character]) -> Vec<Node> {
    characters.iter().map(Node::from).collect()
}

fn settle(simulation: &mut Simulation) {
    for _ in 0..5_000 {
        if !simulation.on_frame() {
            break;
        }
    }
    assert_eq!(simulation.state(), SimulationState::Settled);
}

#[test]
fn structured_input_passes_through_extraction() {
    let links = extract_relationships(&cast());
    assert_eq!(
        links,
        vec![
            Link::new("l1", "a", "b", LinkKind::Friend).with_strength(8.0),
            Link::new("l2", "b", "c", LinkKind::Friend).with_strength(2.0),
        ]
    );
}

#[test]
fn stronger_link_settles_shorter() {
    let characters = cast();
    let links = extract_relationships(&characters);
    let mut simulation = Simulation::new(
        &nodes(&characters),
        &links,
        800.0,
        600.0,
        SimulationConfig::default(),
    );
    settle(&mut simulation);

    let snapshot = simulation.snapshot();
    let ab = snapshot.distance("a", "b").unwrap();
    let bc = snapshot.distance("b", "c").unwrap();
    assert!(ab < bc, "a-b {ab} should be shorter than b-c {bc}");
}

#[test]
fn reheat_after_settling_runs_hot_again() {
    let characters = cast();
    let links = extract_relationships(&characters);
    let mut simulation = Simulation::new(
        &nodes(&characters),
        &links,
        800.0,
        600.0,
        SimulationConfig::default(),
    );
    settle(&mut simulation);

    let mut previous = simulation.positions();
    simulation.controller().reheat();
    assert!(simulation.on_frame());
    assert!(simulation.alpha() >= 0.9);
    assert_eq!(simulation.state(), SimulationState::Running);

    let mut largest_step = 0.0_f32;
    for _ in 0..30 {
        let current = simulation.positions();
        for (id, position) in &current {
            largest_step = largest_step.max((*position - previous[id]).length());
        }
        previous = current;
        simulation.on_frame();
    }
    assert!(largest_step > 1e-3, "largest per-tick move was {largest_step}");
}

#[test]
fn dangling_links_do_not_contribute_forces() {
    let characters = cast();
    let links = extract_relationships(&characters);
    let mut with_ghost = links.clone();
    with_ghost.push(Link::new("ghost", "a", "nobody", LinkKind::Enemy).with_strength(10.0));

    let mut clean =
        Simulation::new(&nodes(&characters), &links, 800.0, 600.0, SimulationConfig::default());
    let mut haunted = Simulation::new(
        &nodes(&characters),
        &with_ghost,
        800.0,
        600.0,
        SimulationConfig::default(),
    );
    for _ in 0..50 {
        clean.tick();
        haunted.tick();
    }
    assert_eq!(clean.positions(), haunted.positions());
}

#[test]
fn dragged_node_follows_pointer_while_rest_adapts() {
    let characters = cast();
    let links = extract_relationships(&characters);
    let mut simulation =
        Simulation::new(&nodes(&characters), &links, 800.0, 600.0, SimulationConfig::default());
    settle(&mut simulation);
    let c_before = simulation.node_position("c").unwrap();

    let controller = simulation.controller();
    let pointer = PointerId(4);
    controller.drag_start(pointer, "a");
    for step in 0..30 {
        controller.drag_move(pointer, 100.0 + step as f32, 100.0);
        assert!(simulation.on_frame());
        let a = simulation.snapshot().node("a").cloned().unwrap();
        assert_eq!((a.x, a.y), (100.0 + step as f32, 100.0));
    }
    controller.drag_end(pointer);
    simulation.on_frame();

    assert!(!simulation.snapshot().node("a").unwrap().is_pinned());
    assert!((simulation.node_position("c").unwrap() - c_before).length() > 1.0);
}
