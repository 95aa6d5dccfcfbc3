//! Graph editing through the canvas session: ids, connections, deletes,
//! imports and pointer gestures.

mod common;

use common::builders::PipelineBuilder;
use common::{messages, session};
use mlcanvas::canvas::{Point, PointerButton};
use mlcanvas::graph::{ConnectOutcome, GraphError, ImportError, NodeId};
use mlcanvas::ComponentLibrary;
use proptest::prelude::*;

fn pairs(session: &mlcanvas::CanvasSession<mlcanvas::SceneBuffer>) -> Vec<(String, String)> {
    session
        .graph()
        .edges()
        .iter()
        .map(|e| (e.source.to_string(), e.target.to_string()))
        .collect()
}

#[test]
fn test_add_node_selects_and_seeds_defaults() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let component = library.get("train-test-split").unwrap();

    let node = session.add_node(component, 120.0, 80.0);

    assert_eq!(node.id.as_str(), "node-1");
    assert_eq!(session.selected(), Some(&node.id));
    assert_eq!(node.data.parameters.len(), component.parameters.len());
    assert_eq!(session.target().scene.nodes.len(), 1);
    assert_eq!(session.history().undo_len(), 2);
}

#[test]
fn test_node_ids_never_reused_after_delete() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let loader = library.get("csv-loader").unwrap();

    let a = session.add_node(loader, 0.0, 0.0);
    let b = session.add_node(loader, 300.0, 0.0);
    session.delete_node(&b.id);
    let c = session.add_node(loader, 600.0, 0.0);

    assert_eq!(a.id.as_str(), "node-1");
    assert_eq!(c.id.as_str(), "node-3");
}

#[test]
fn test_duplicate_connection_is_reported_not_added() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let a = session.add_node(library.get("csv-loader").unwrap(), 0.0, 0.0);
    let b = session.add_node(library.get("standard-scaler").unwrap(), 300.0, 0.0);

    let first = session.connect(&a.id, &b.id).unwrap();
    assert!(matches!(first, ConnectOutcome::Connected(_)));
    let history_len = session.history().undo_len();
    messages(&mut session);

    let second = session.connect(&a.id, &b.id).unwrap();
    assert!(matches!(second, ConnectOutcome::Duplicate(_)));
    assert_eq!(session.graph().edges().len(), 1);
    assert_eq!(session.history().undo_len(), history_len);
    assert_eq!(messages(&mut session), vec!["Connection already exists"]);
}

#[test]
fn test_self_connection_rejected() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let a = session.add_node(library.get("pca").unwrap(), 0.0, 0.0);

    assert_eq!(
        session.connect(&a.id, &a.id),
        Err(GraphError::SelfConnection(a.id.clone()))
    );
    assert!(session.graph().edges().is_empty());
}

#[test]
fn test_connect_unknown_endpoint_rejected() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let a = session.add_node(library.get("pca").unwrap(), 0.0, 0.0);
    let ghost = NodeId::new("node-99");

    assert_eq!(
        session.connect(&a.id, &ghost),
        Err(GraphError::UnknownNode(ghost.clone()))
    );
}

#[test]
fn test_delete_node_cascades_incident_edges() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let scaler = library.get("standard-scaler").unwrap();
    let a = session.add_node(scaler, 0.0, 0.0);
    let b = session.add_node(scaler, 300.0, 0.0);
    let c = session.add_node(scaler, 600.0, 0.0);
    session.connect(&a.id, &b.id).unwrap();
    session.connect(&b.id, &c.id).unwrap();
    session.connect(&a.id, &c.id).unwrap();

    session.delete_node(&b.id);

    assert_eq!(
        pairs(&session),
        vec![("node-1".to_string(), "node-3".to_string())]
    );
    assert!(session.selected().is_none());
    assert_eq!(session.target().scene.edges.len(), 1);
}

#[test]
fn test_delete_edge_notifies_with_labels() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let a = session.add_node(library.get("csv-loader").unwrap(), 0.0, 0.0);
    let b = session.add_node(library.get("standard-scaler").unwrap(), 300.0, 0.0);
    let ConnectOutcome::Connected(edge) = session.connect(&a.id, &b.id).unwrap() else {
        panic!("expected a new edge");
    };
    messages(&mut session);

    assert!(session.delete_edge(&edge.id).is_some());
    let expected = format!("Disconnected: {} → {}", a.label(), b.label());
    assert_eq!(messages(&mut session), vec![expected]);

    // Unknown ids are a silent no-op
    let len = session.history().undo_len();
    assert!(session.delete_edge(&edge.id).is_none());
    assert_eq!(session.history().undo_len(), len);
}

#[test]
fn test_update_parameter_merges_value() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let split = session.add_node(library.get("train-test-split").unwrap(), 0.0, 0.0);

    session
        .update_node_parameter(&split.id, "test_size", 0.3.into())
        .unwrap();

    let node = session.graph().node(&split.id).unwrap();
    assert_eq!(
        node.data.parameters.get("test_size").and_then(|v| v.as_f64()),
        Some(0.3)
    );
    assert_eq!(
        session.history().last_action().map(|a| a.tag()),
        Some("UPDATE_PARAMS")
    );
}

#[test]
fn test_import_rejections_leave_graph_untouched() {
    let mut session = session();
    session.load_template("iris-classification");
    let before = session.graph().snapshot();
    let history_len = session.history().undo_len();

    assert_eq!(session.import_json("  "), Err(ImportError::Empty));
    assert!(matches!(
        session.import_json("{not json"),
        Err(ImportError::InvalidJson(_))
    ));
    assert_eq!(
        session.import_json(r#"{"edges": []}"#),
        Err(ImportError::MissingNodes)
    );

    assert_eq!(session.graph().snapshot(), before);
    assert_eq!(session.history().undo_len(), history_len);
}

#[test]
fn test_import_recomputes_id_counters() {
    let mut session = session();
    let json = r#"{
        "name": "imported",
        "nodes": [
            {"id": "node-7", "type": "data", "position": {"x": 0, "y": 0},
             "data": {"componentId": "csv-loader", "label": "CSV Loader", "icon": "", "parameters": {}}}
        ],
        "edges": []
    }"#;

    let history_len = session.history().undo_len();
    session.import_json(json).unwrap();
    assert_eq!(session.history().undo_len(), history_len);

    let library = ComponentLibrary::builtin();
    let node = session.add_node(library.get("pca").unwrap(), 0.0, 0.0);
    assert_eq!(node.id.as_str(), "node-8");
}

#[test]
fn test_drag_from_output_to_input_connects() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let a = session.add_node(library.get("csv-loader").unwrap(), 0.0, 0.0);
    let b = session.add_node(library.get("standard-scaler").unwrap(), 400.0, 0.0);

    // Output handle sits at the right middle, input at the left middle.
    session.pointer_down(Point::new(200.0, 40.0), PointerButton::Primary);
    session.pointer_move(Point::new(300.0, 60.0));
    assert!(session.target().guide.is_some());
    session.pointer_up(Point::new(400.0, 40.0));

    assert!(session.target().guide.is_none());
    assert!(session.gesture().is_idle());
    assert_eq!(session.graph().edges().len(), 1);
    assert!(session.graph().has_edge(&a.id, &b.id).is_some());
}

#[test]
fn test_node_drag_moves_without_history() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let a = session.add_node(library.get("pca").unwrap(), 0.0, 0.0);
    let len = session.history().undo_len();

    session.pointer_down(Point::new(100.0, 40.0), PointerButton::Primary);
    session.pointer_move(Point::new(150.0, 70.0));
    session.pointer_up(Point::new(150.0, 70.0));

    let node = session.graph().node(&a.id).unwrap();
    assert_eq!((node.position.x, node.position.y), (50.0, 30.0));
    assert_eq!(session.history().undo_len(), len);
}

#[test]
fn test_background_drag_pans() {
    let mut session = session();

    session.pointer_down(Point::new(500.0, 500.0), PointerButton::Primary);
    session.pointer_move(Point::new(520.0, 490.0));
    session.pointer_up(Point::new(520.0, 490.0));

    let transform = session.transform();
    assert_eq!((transform.x, transform.y), (20.0, -10.0));
}

#[test]
fn test_builder_graph_matches_session_semantics() {
    let graph = PipelineBuilder::new()
        .node("standard-scaler")
        .node("standard-scaler")
        .node("standard-scaler")
        .connect(0, 1)
        .connect(1, 2)
        .connect(0, 2)
        .build();

    let mut graph = graph;
    let middle = graph.nodes()[1].id.clone();
    graph.remove_node(&middle);
    assert_eq!(graph.edges().len(), 1);
}

#[test]
fn test_property_form_edit_flow() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let split = session.add_node(library.get("train-test-split").unwrap(), 0.0, 0.0);

    let form = session.property_form().expect("new node is selected");
    assert_eq!(form.node_id, split.id);
    assert_eq!(form.component_name, "Train/Test Split");
    assert!(form.parse_field("test_size", "abc").is_err());

    let value = form.parse_field("test_size", "0.25").unwrap();
    session
        .update_node_parameter(&split.id, "test_size", value)
        .unwrap();

    let form = session.property_form().unwrap();
    assert_eq!(form.field("test_size").map(|f| f.display_value()), Some("0.25".to_string()));

    session.click(Point::new(900.0, 700.0));
    assert!(session.property_form().is_none());
}

proptest! {
    #[test]
    fn prop_node_ids_strictly_increase(ops in prop::collection::vec(any::<bool>(), 1..40)) {
        let library = ComponentLibrary::builtin();
        let component = library.get("pca").unwrap();
        let mut graph = mlcanvas::GraphModel::new();
        let mut seen = Vec::new();

        for add in ops {
            if add || graph.nodes().is_empty() {
                let node = graph.add_node(component, 0.0, 0.0);
                seen.push(node.id.numeric_suffix().unwrap());
            } else {
                let victim = graph.nodes()[0].id.clone();
                graph.remove_node(&victim);
            }
        }

        prop_assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }
}
