use filespace_layout::geom::point;
use filespace_layout::{Error, ForceConfig, NodeId, Simulation, WorldPoint};

fn id(raw: u64) -> NodeId {
    NodeId::new(raw)
}

/// Root 0 with children 1 (folder) and 2, and grandchildren 3, 4 under 1.
fn small_tree() -> Simulation {
    let mut sim = Simulation::new(ForceConfig::default()).expect("default config is valid");
    sim.add_node(id(0), None).unwrap();
    sim.add_node(id(1), Some(id(0))).unwrap();
    sim.add_node(id(2), Some(id(0))).unwrap();
    sim.add_node(id(3), Some(id(1))).unwrap();
    sim.add_node(id(4), Some(id(1))).unwrap();
    sim
}

#[test]
fn root_and_two_children_yield_three_nodes_and_two_edges() {
    let mut sim = Simulation::default();
    sim.add_node(id(10), None).unwrap();
    sim.add_node(id(11), Some(id(10))).unwrap();
    sim.add_node(id(12), Some(id(10))).unwrap();

    assert_eq!(sim.node_count(), 3);
    assert_eq!(sim.edge_count(), 2);
    assert_eq!(sim.node(id(11)).unwrap().depth, 1);
    assert_eq!(sim.node(id(12)).unwrap().depth, 1);
    assert_eq!(sim.node(id(10)).unwrap().degree, 2);
}

#[test]
fn second_root_is_rejected() {
    let mut sim = Simulation::default();
    sim.add_node(id(0), None).unwrap();
    let err = sim.add_node(id(1), None).unwrap_err();
    assert!(matches!(
        err,
        Error::SecondRoot { existing, attempted } if existing == id(0) && attempted == id(1)
    ));
    assert_eq!(sim.node_count(), 1);
}

#[test]
fn duplicate_and_orphan_inserts_are_rejected() {
    let mut sim = Simulation::default();
    sim.add_node(id(0), None).unwrap();
    assert!(matches!(sim.add_node(id(0), Some(id(0))), Err(Error::DuplicateNode(_))));
    assert!(matches!(
        sim.add_node(id(5), Some(id(99))),
        Err(Error::UnknownParent { .. })
    ));
    assert_eq!(sim.node_count(), 1);
    assert_eq!(sim.edge_count(), 0);
}

#[test]
fn removing_a_node_with_children_fails_loudly() {
    let mut sim = small_tree();
    let err = sim.remove_node(id(1)).unwrap_err();
    assert!(matches!(err, Error::HasChildren { children: 2, .. }));
    assert_eq!(sim.node_count(), 5);
    assert_eq!(sim.edge_count(), 4);
}

#[test]
fn removing_leaves_keeps_counts_and_lookups_consistent() {
    let mut sim = small_tree();
    sim.remove_node(id(3)).unwrap();
    assert_eq!(sim.node_count(), 4);
    assert_eq!(sim.edge_count(), 3);
    assert_eq!(sim.node(id(1)).unwrap().degree, 2);

    // Lookups for nodes stored after the removed slot still resolve.
    assert_eq!(sim.node(id(4)).unwrap().id, id(4));

    sim.remove_node(id(4)).unwrap();
    sim.remove_node(id(1)).unwrap();
    assert_eq!(sim.node_count(), 2);
    assert_eq!(sim.edge_count(), 1);
    assert!(sim.node(id(1)).is_none());
    assert!(matches!(sim.remove_node(id(1)), Err(Error::UnknownNode(_))));
}

#[test]
fn childless_root_can_be_removed_and_replaced() {
    let mut sim = Simulation::default();
    sim.add_node(id(0), None).unwrap();
    sim.remove_node(id(0)).unwrap();
    assert_eq!(sim.root(), None);
    sim.add_node(id(1), None).unwrap();
    assert_eq!(sim.root(), Some(id(1)));
}

#[test]
fn root_stays_pinned_at_origin_through_steps() {
    let mut sim = small_tree();
    for _ in 0..200 {
        sim.step();
        let root = sim.node(id(0)).unwrap();
        assert_eq!(root.position, WorldPoint::origin());
        assert!(root.is_pinned());
    }
}

#[test]
fn root_cannot_be_unpinned_or_moved() {
    let mut sim = small_tree();
    sim.unpin(id(0)).unwrap();
    sim.pin(id(0), point(40.0, -12.0)).unwrap();
    sim.step();
    let root = sim.node(id(0)).unwrap();
    assert!(root.is_pinned());
    assert_eq!(root.position, WorldPoint::origin());
}

#[test]
fn rest_length_strictly_decreases_with_depth() {
    let sim = Simulation::default();
    for depth in 0..10 {
        assert!(sim.rest_length(depth + 1) < sim.rest_length(depth));
    }
    assert!((sim.rest_length(0) - 50.0).abs() < 1e-12);
    assert!((sim.rest_length(1) - 30.0).abs() < 1e-12);
}

#[test]
fn pinned_nodes_hold_their_override_position() {
    let mut sim = small_tree();
    sim.pin(id(2), point(80.0, 25.0)).unwrap();
    for _ in 0..20 {
        sim.step();
        assert_eq!(sim.position(id(2)), Some(point(80.0, 25.0)));
    }
    sim.unpin(id(2)).unwrap();
    sim.step();
    assert!(!sim.node(id(2)).unwrap().is_pinned());
}

#[test]
fn layout_converges_to_finite_nested_positions() {
    let mut sim = small_tree();
    let steps = sim.run_until_settled(5_000);
    assert!(steps < 5_000, "layout did not settle");
    assert!(sim.is_settled());

    for n in sim.nodes() {
        assert!(n.position.x.is_finite() && n.position.y.is_finite(), "{:?}", n);
    }
    let child = sim.position(id(1)).unwrap().distance_to(WorldPoint::origin());
    assert!(child > 10.0 && child < 200.0, "child distance {child}");
}

#[test]
fn settled_layout_does_not_drift() {
    let mut sim = small_tree();
    sim.run_until_settled(5_000);
    let before: Vec<WorldPoint> = sim.nodes().iter().map(|n| n.position).collect();
    for _ in 0..50 {
        let stats = sim.step();
        assert!(stats.settled);
    }
    for (n, p) in sim.nodes().iter().zip(before) {
        assert!(n.position.distance_to(p) < 1e-9);
    }
}

#[test]
fn restart_sustain_and_cool_down_drive_alpha() {
    let mut sim = small_tree();
    sim.run_until_settled(5_000);

    sim.restart(0.3);
    assert!((sim.alpha() - 0.3).abs() < 1e-12);
    assert!(!sim.step().settled);

    sim.sustain(0.3);
    for _ in 0..1_000 {
        sim.step();
    }
    assert!((sim.alpha() - 0.3).abs() < 1e-3, "alpha {}", sim.alpha());
    assert!(!sim.is_settled());

    sim.cool_down();
    assert!(sim.run_until_settled(5_000) < 5_000);
    assert!(sim.is_settled());
}

#[test]
fn topology_changes_reheat_a_settled_layout() {
    let mut sim = small_tree();
    sim.run_until_settled(5_000);
    sim.add_node(id(5), Some(id(2))).unwrap();
    assert!(sim.alpha() >= 0.3);
    assert!(!sim.step().settled);
}

#[test]
fn coincident_nodes_do_not_stall_the_simulation() {
    let mut sim = Simulation::default();
    sim.add_node(id(0), None).unwrap();
    sim.add_node(id(1), Some(id(0))).unwrap();
    sim.add_node(id(2), Some(id(0))).unwrap();
    sim.pin(id(1), point(5.0, 5.0)).unwrap();
    sim.pin(id(2), point(5.0, 5.0)).unwrap();
    sim.unpin(id(1)).unwrap();
    sim.unpin(id(2)).unwrap();

    for _ in 0..10 {
        sim.step();
    }
    let a = sim.position(id(1)).unwrap();
    let b = sim.position(id(2)).unwrap();
    assert!(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite());
    assert!(a.distance_to(b) > 0.0);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = ForceConfig {
        base_factor: 1.2,
        ..Default::default()
    };
    assert!(matches!(Simulation::new(cfg), Err(Error::InvalidConfig { .. })));

    let cfg = ForceConfig {
        velocity_decay: 2.0,
        ..Default::default()
    };
    assert!(matches!(Simulation::new(cfg), Err(Error::InvalidConfig { .. })));
}

#[test]
fn force_config_reads_partial_camel_case_json() {
    let cfg: ForceConfig =
        serde_json::from_str(r#"{ "baseFactor": 0.5, "linkBaseDistance": 80 }"#).unwrap();
    assert_eq!(cfg.base_factor, 0.5);
    assert_eq!(cfg.link_base_distance, 80.0);
    assert_eq!(cfg.repulsion_strength, ForceConfig::default().repulsion_strength);
}

#[test]
fn a_child_added_after_a_sibling_is_removed_gets_a_fresh_seed() {
    let mut sim = Simulation::default();
    sim.add_node(id(0), None).unwrap();
    sim.add_node(id(1), Some(id(0))).unwrap();
    sim.add_node(id(2), Some(id(0))).unwrap();
    sim.remove_node(id(1)).unwrap();
    sim.add_node(id(3), Some(id(0))).unwrap();

    let b = sim.position(id(2)).unwrap();
    let c = sim.position(id(3)).unwrap();
    assert!(b.distance_to(c) > 1.0, "{b:?} and {c:?} overlap");
    assert_eq!(sim.node(id(0)).unwrap().spawned, 3);
    assert_eq!(sim.node(id(0)).unwrap().degree, 2);
}
