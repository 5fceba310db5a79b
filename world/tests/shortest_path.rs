use arena_core::{MapDescription, NodeRecord, Point, Rect};
use arena_world::{load, query, update_target_box, GraphNode, Predecessor, VisibilityGraph};

fn record(x: f64, y: f64, edges: &[usize]) -> NodeRecord {
    NodeRecord {
        x,
        y,
        edges: edges.to_vec(),
    }
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, width, height).expect("valid rect")
}

/// Five nodes where the cheapest route under squared weights takes more hops
/// than the shortest Euclidean one.
fn kite() -> Vec<NodeRecord> {
    vec![
        record(0.0, 0.0, &[1, 2, 3]),
        record(1.0, 0.0, &[0, 2, 3]),
        record(3.0, 0.0, &[0, 1, 4]),
        record(0.0, 2.0, &[0, 1, 4]),
        record(3.0, 2.0, &[2, 3]),
    ]
}

fn distances(graph: &VisibilityGraph) -> Vec<f64> {
    graph.nodes().iter().map(GraphNode::distance).collect()
}

fn predecessors(graph: &VisibilityGraph) -> Vec<Predecessor> {
    graph.nodes().iter().map(GraphNode::predecessor).collect()
}

#[test]
fn squared_weights_prefer_short_hops() {
    let mut graph = VisibilityGraph::from_records(&kite()).expect("valid graph");
    graph.recompute_from(0);

    assert_eq!(distances(&graph), vec![0.0, 1.0, 5.0, 4.0, 9.0]);
    assert_eq!(
        predecessors(&graph),
        vec![
            Predecessor::Target,
            Predecessor::Node(0),
            Predecessor::Node(1),
            Predecessor::Node(0),
            Predecessor::Node(2),
        ],
        "0 -> 2 directly costs 9 but via 1 only 5",
    );
    assert_eq!(graph.route(4), vec![4, 2, 1, 0]);
}

#[test]
fn recompute_replaces_previous_tree() {
    let mut graph = VisibilityGraph::from_records(&kite()).expect("valid graph");
    graph.recompute_from(0);
    graph.recompute_from(4);

    assert_eq!(graph.root(), Some(4));
    assert_eq!(distances(&graph), vec![9.0, 8.0, 4.0, 9.0, 0.0]);
    assert_eq!(graph.route(0), vec![0, 1, 2, 4]);
    assert_eq!(graph.route(3), vec![3, 4]);
}

#[test]
fn predecessor_chains_are_consistent_on_a_grid() {
    let side = 6;
    let records: Vec<NodeRecord> = (0..side * side)
        .map(|index| {
            let (x, y) = (index % side, index / side);
            let mut edges = Vec::new();
            if x > 0 {
                edges.push(index - 1);
            }
            if x + 1 < side {
                edges.push(index + 1);
            }
            if y > 0 {
                edges.push(index - side);
            }
            if y + 1 < side {
                edges.push(index + side);
            }
            record(x as f64 * 2.0, y as f64 * 3.0, &edges)
        })
        .collect();
    let mut graph = VisibilityGraph::from_records(&records).expect("valid graph");
    graph.recompute_from(14);

    for (index, node) in graph.nodes().iter().enumerate() {
        match node.predecessor() {
            Predecessor::Target => assert_eq!(index, 14),
            Predecessor::Node(parent) => {
                let parent_node = graph.node(parent).expect("parent exists");
                let step = node.position().distance_squared(parent_node.position());
                assert!(node.edges().contains(&parent), "{index} follows a non-edge");
                assert!(parent_node.distance() < node.distance());
                assert!((parent_node.distance() + step - node.distance()).abs() < 1e-9);
            }
            Predecessor::Unreached => panic!("node {index} unreached on a connected grid"),
        }
        assert_eq!(graph.route(index).last(), Some(&14));
    }
}

#[test]
fn unreachable_nodes_have_no_route() {
    let records = vec![
        record(0.0, 0.0, &[1]),
        record(1.0, 0.0, &[0]),
        record(9.0, 9.0, &[]),
    ];
    let mut graph = VisibilityGraph::from_records(&records).expect("valid graph");
    graph.recompute_from(0);

    assert_eq!(graph.node(2).map(GraphNode::predecessor), Some(Predecessor::Unreached));
    assert!(graph.node(2).map(GraphNode::distance).is_some_and(f64::is_infinite));
    assert!(graph.route(2).is_empty());
    assert!(graph.route(7).is_empty());
}

#[test]
fn out_of_range_root_is_ignored() {
    let mut graph = VisibilityGraph::from_records(&kite()).expect("valid graph");
    graph.recompute_from(1);
    graph.recompute_from(42);

    assert_eq!(graph.root(), Some(1));
    assert_eq!(graph.route(4), vec![4, 2, 1]);
}

#[test]
fn hidden_target_keeps_cached_root() {
    let map = MapDescription {
        width: 20.0,
        height: 20.0,
        primary_spawn: Point::new(1.0, 1.0),
        secondary_spawns: vec![Point::new(18.0, 18.0)],
        bounds: vec![rect(8.0, 0.0, 4.0, 20.0)],
        graph: vec![record(2.5, 2.5, &[1]), record(4.5, 10.5, &[0])],
    };
    let mut state = load(map, rect(1.0, 1.0, 2.0, 2.0)).expect("valid map");
    assert_eq!(query::root(&state), Some(0));

    let behind_wall = rect(15.0, 10.0, 2.0, 2.0);
    assert!(!update_target_box(&mut state, behind_wall));
    assert_eq!(query::root(&state), Some(0), "no node sees the target");
    assert_eq!(query::target_box(&state), behind_wall);
    assert_eq!(query::target_position(&state), Point::new(16.0, 11.0));
}

#[test]
fn load_is_repeatable_from_json() {
    let json = r#"{
        "width": 10.0,
        "height": 10.0,
        "primarySpawn": { "x": 1.0, "y": 1.0 },
        "secondarySpawns": [{ "x": 8.0, "y": 8.0 }],
        "bounds": [],
        "graph": [
            { "x": 2.5, "y": 2.5, "edges": [1] },
            { "x": 7.5, "y": 7.5, "edges": [0] }
        ]
    }"#;
    let map: MapDescription = serde_json::from_str(json).expect("valid json");
    let state = load(map, rect(7.0, 7.0, 1.0, 1.0)).expect("valid map");

    assert_eq!(query::root(&state), Some(1));
    assert_eq!(query::route(&state, 0), vec![0, 1]);
    assert_eq!(query::secondary_spawns(&state), &[Point::new(8.0, 8.0)]);
}
