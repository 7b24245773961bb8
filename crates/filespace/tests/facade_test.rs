use filespace::geom::{screen_point, vector};
use filespace::{
    ActionHost, Camera, Collaborators, Error, Filespace, FilespaceConfig, FilespaceNode, Hit,
    InputQueue, InteractionState, ItemKind, Menu, MenuSection, NodeId, PlaneCamera, ScreenPoint,
    SurfaceKind, TreeSpec, ViewPicker, WheelEvent, WorldPoint,
};

struct NoMenu;

impl Menu for NoMenu {
    fn show(&mut self, _node: NodeId, _sections: &[MenuSection], _at: ScreenPoint) {}
    fn hide(&mut self) {}
}

struct Host;

impl ActionHost for Host {
    fn download_url(&self, node: &FilespaceNode) -> String {
        format!("/files/{}", node.name())
    }
}

fn small() -> (Filespace, NodeId, NodeId, NodeId) {
    let mut fs = Filespace::with_defaults();
    let r = fs.add_folder(None, "R").unwrap();
    let f1 = fs.add_file(r, "F1").unwrap();
    let d1 = fs.add_folder(Some(r), "D1").unwrap();
    (fs, r, f1, d1)
}

#[test]
fn tree_and_simulation_stay_in_lockstep() {
    let (mut fs, r, f1, d1) = small();
    let sim = fs.simulation();
    assert_eq!(sim.node_count(), 3);
    assert_eq!(sim.edge_count(), 2);
    assert_eq!(sim.node(f1).unwrap().depth, 1);
    assert_eq!(sim.node(d1).unwrap().depth, 1);
    assert_eq!(fs.root(), Some(r));

    let err = fs.add_folder(None, "R2").unwrap_err();
    assert!(matches!(err, Error::MultipleRoots { existing } if existing == r));
    let err = fs.add_file(f1, "inside a file").unwrap_err();
    assert!(matches!(err, Error::ParentNotFolder { .. }));
    assert_eq!(fs.len(), 3);
    assert_eq!(fs.simulation().node_count(), 3);

    let leaf = fs.add_file(d1, "deep.txt").unwrap();
    let err = fs.remove_item(d1).unwrap_err();
    assert!(matches!(err, Error::HasChildren { node, children: 1 } if node == d1));
    assert_eq!(fs.simulation().node_count(), 4);

    fs.remove_item(leaf).unwrap();
    fs.remove_item(d1).unwrap();
    assert_eq!(fs.len(), 2);
    assert_eq!(fs.simulation().node_count(), 2);
    assert_eq!(fs.simulation().edge_count(), 1);
    assert!(matches!(fs.remove_item(d1), Err(Error::UnknownNode(_))));
}

#[test]
fn loading_the_sample_tree() {
    let mut fs = Filespace::with_defaults();
    let root = fs.load(None, &TreeSpec::sample()).unwrap();
    assert_eq!(fs.len(), 12);
    assert_eq!(fs.simulation().node_count(), 12);
    assert_eq!(fs.simulation().edge_count(), 11);
    assert_eq!(fs.get(root).unwrap().name(), "My Files");
    assert_eq!(fs.tree().children(root).len(), 7);

    let extra = fs
        .load(Some(root), &TreeSpec::folder("Extra", vec![TreeSpec::file("x")]))
        .unwrap();
    assert_eq!(fs.get(extra).unwrap().depth(), 1);
    assert_eq!(fs.len(), 14);
}

#[test]
fn loading_rejects_invalid_trees_before_inserting() {
    let mut fs = Filespace::with_defaults();
    let bad = TreeSpec {
        name: "root".into(),
        kind: ItemKind::Folder,
        children: vec![TreeSpec {
            name: "f".into(),
            kind: ItemKind::File,
            children: vec![TreeSpec::file("nested")],
        }],
    };
    assert!(matches!(fs.load(None, &bad), Err(Error::InvalidTree { .. })));
    assert!(fs.is_empty());
    assert_eq!(fs.simulation().node_count(), 0);

    fs.load(None, &TreeSpec::sample()).unwrap();
    assert!(matches!(
        fs.load(None, &TreeSpec::sample()),
        Err(Error::MultipleRoots { .. })
    ));
    assert_eq!(fs.len(), 12);
}

#[test]
fn settled_layout_keeps_children_around_the_root() {
    let mut fs = Filespace::with_defaults();
    let root = fs.load(None, &TreeSpec::sample()).unwrap();
    let steps = fs.settle(5_000);
    assert!(steps < 5_000);
    assert!(fs.simulation().is_settled());

    let views = fs.views();
    assert_eq!(views.len(), 12);
    let root_view = views.iter().find(|v| v.id == root).unwrap();
    assert_eq!(root_view.position, WorldPoint::origin());
    assert!(root_view.pinned);
    assert_eq!(root_view.scale, 1.0);
    assert!(root_view.has_children);
    for v in views.iter().filter(|v| v.depth == 1) {
        let d = v.position.distance_to(WorldPoint::origin());
        assert!(d > 10.0 && d < 200.0, "{} at {d}", v.name);
        assert!((v.scale - 0.6).abs() < 1e-12);
    }

    let links = fs.links();
    assert_eq!(links.len(), 11);
    let geometry = &fs.config().geometry;
    assert!(links.iter().all(|l| l.visible_segment(geometry).is_some()));
}

#[test]
fn update_drives_a_node_drag_through_the_input_queue() {
    let (mut fs, _r, _f1, d1) = small();
    let mut camera = PlaneCamera::new(&fs.config().camera);
    let grab = screen_point(400.0, 300.0);
    let mut picker = move |at: ScreenPoint| {
        (at.distance_to(grab) < 1.0).then_some(Hit {
            surface: SurfaceKind::DragHandle,
            node: d1,
            distance: 0.0,
        })
    };
    let mut menu = NoMenu;
    let mut queue = InputQueue::new();

    queue.pan_start(grab);
    queue.pan_move(screen_point(450.0, 320.0));
    let before = fs.simulation().position(d1).unwrap();
    let report = {
        let mut io = Collaborators {
            picker: &mut picker,
            camera: &mut camera,
            menu: &mut menu,
            host: &Host,
        };
        fs.update(&mut queue.pop_frame(), &mut io)
    };
    assert!(!report.step.settled);
    assert!(matches!(
        fs.state(),
        InteractionState::NodeDragging { node, .. } if node == d1
    ));
    let moved = fs.simulation().position(d1).unwrap();
    let expected = before
        + (camera.point_to_world(screen_point(450.0, 320.0)) - camera.point_to_world(grab));
    assert!(moved.distance_to(expected) < 1e-9);

    queue.pan_end(screen_point(450.0, 320.0));
    queue.wheel(&WheelEvent {
        delta_y: -100.0,
        ..Default::default()
    });
    queue.pointer_moved(screen_point(10.0, 10.0));
    let distance_before = camera.distance();
    let report = {
        let mut io = Collaborators {
            picker: &mut picker,
            camera: &mut camera,
            menu: &mut menu,
            host: &Host,
        };
        fs.update(&mut queue.pop_frame(), &mut io)
    };
    assert_eq!(fs.state(), InteractionState::Idle);
    assert!(!fs.simulation().node(d1).unwrap().is_pinned());
    assert_eq!(report.outcome.zoom_factors.len(), 1);
    assert!(camera.distance() < distance_before);
}

#[test]
fn hovered_node_is_flagged_in_views() {
    let (mut fs, _r, f1, _d1) = small();
    let mut camera = PlaneCamera::default();
    let mut picker = move |_: ScreenPoint| {
        Some(Hit {
            surface: SurfaceKind::NodeBody,
            node: f1,
            distance: 3.0,
        })
    };
    let mut menu = NoMenu;
    let mut queue = InputQueue::new();
    queue.pointer_moved(screen_point(1.0, 1.0));
    let mut io = Collaborators {
        picker: &mut picker,
        camera: &mut camera,
        menu: &mut menu,
        host: &Host,
    };
    fs.update(&mut queue.pop_frame(), &mut io);

    let hovered: Vec<_> = fs.views().into_iter().filter(|v| v.hovered).collect();
    assert_eq!(hovered.len(), 1);
    assert_eq!(hovered[0].id, f1);
    assert_eq!(hovered[0].kind, ItemKind::File);

    fs.reset_interaction();
    assert!(fs.views().iter().all(|v| !v.hovered));
}

#[test]
fn menu_for_unknown_items_is_an_error() {
    let (fs, _r, f1, _d1) = small();
    let sections = fs.menu_for(f1, &Host).unwrap();
    assert_eq!(sections[0].entries[0].label, "Download");
    assert!(matches!(
        fs.menu_for(NodeId::new(999), &Host),
        Err(Error::UnknownNode(_))
    ));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = FilespaceConfig::default();
    config.layout.base_factor = 0.0;
    assert!(matches!(Filespace::new(config), Err(Error::Layout(_))));

    let mut config = FilespaceConfig::default();
    config.camera.near = 50_000.0;
    assert!(matches!(
        Filespace::new(config),
        Err(Error::InvalidConfig { .. })
    ));
}

#[test]
fn view_picker_opens_the_menu_under_a_dropdown_button() {
    let (mut fs, r, _f1, d1) = small();
    fs.settle(5_000);
    let camera = PlaneCamera::new(&fs.config().camera);
    let view = fs.views().into_iter().find(|v| v.id == d1).unwrap();
    let button = camera.world_to_screen(view.position + vector(0.0, 5.0) * view.scale);
    let body = camera.world_to_screen(WorldPoint::origin());

    let mut picker = ViewPicker::new(fs.views(), fs.config().geometry.clone(), camera.clone());
    let mut camera = camera;
    let mut menu = NoMenu;
    let mut queue = InputQueue::new();
    queue.tap(body);
    queue.tap(button);
    queue.pointer_moved(body);
    let report = {
        let mut io = Collaborators {
            picker: &mut picker,
            camera: &mut camera,
            menu: &mut menu,
            host: &Host,
        };
        fs.update(&mut queue.pop_frame(), &mut io)
    };
    assert_eq!(report.outcome.menus_opened, vec![d1]);
    let hover = fs.controller().hover().expect("hovering the root");
    assert_eq!((hover.node, hover.surface), (r, SurfaceKind::NodeBody));
}
