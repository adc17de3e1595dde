//! Scene Integration Tests
//!
//! Tests for:
//! - Toolkit: builder, host bindings, drag capability
//! - Node creation: registry entries, stage list, colour keys, canvases
//! - Attribute changes: id/name moves in the registry
//! - Hierarchy: add/remove/destroy, containment rules, scoped lookup
//! - Independent toolkits

use kinetic::canvas::{CanvasMode, Surface};
use kinetic::errors::KineticError;
use kinetic::frame::FrameBinding;
use kinetic::host::HeadlessHost;
use kinetic::scene::{Node, NodeConfig, NodeKind};
use kinetic::settings::Settings;
use kinetic::toolkit::Toolkit;

fn new_toolkit() -> Toolkit {
    let _ = env_logger::builder().is_test(true).try_init();
    Toolkit::builder().build(&HeadlessHost).unwrap()
}

fn named(name: &str) -> NodeConfig {
    NodeConfig::new().with_name(name)
}

// ============================================================================
// Toolkit
// ============================================================================

#[test]
fn headless_toolkit_binds_timer_and_software_canvases() {
    let toolkit = new_toolkit();
    assert!(matches!(toolkit.frames().binding(), FrameBinding::Timer(_)));
    assert_eq!(toolkit.canvases().mode(), CanvasMode::Headless);
    assert!(toolkit.stages().is_empty());
}

#[test]
fn settings_flow_into_registry_and_canvases() {
    let settings = Settings {
        canvas_width: 200,
        canvas_height: 100,
        dbl_click_window: std::time::Duration::from_millis(250),
        ..Default::default()
    };
    let toolkit = Toolkit::builder()
        .with_settings(settings)
        .build(&HeadlessHost)
        .unwrap();

    assert_eq!(
        toolkit.registry().borrow().dbl_click_window(),
        std::time::Duration::from_millis(250)
    );
    let canvas = toolkit.create_canvas().unwrap();
    assert_eq!((canvas.width(), canvas.height()), (200, 100));
}

#[test]
fn installed_toolkit_backs_process_wide_functions() {
    let settings = Settings {
        canvas_width: 77,
        canvas_height: 33,
        ..Default::default()
    };
    let toolkit = Toolkit::builder()
        .with_settings(settings)
        .build(&HeadlessHost)
        .unwrap();
    toolkit.install_process_wide();

    let canvas = kinetic::canvas::create_canvas().unwrap();
    assert_eq!((canvas.width(), canvas.height()), (77, 33));

    let (tx, rx) = std::sync::mpsc::channel();
    kinetic::frame::request_frame(move || {
        let _ = tx.send(());
    });
    assert!(rx.recv_timeout(std::time::Duration::from_secs(2)).is_ok());
}

#[test]
fn toolkit_without_drag_capability_reports_false() {
    let toolkit = new_toolkit();
    assert!(!toolkit.is_dragging());
    assert!(!toolkit.is_drag_ready());
}

#[cfg(feature = "drag-and-drop")]
#[test]
fn toolkit_forwards_drag_state() {
    use std::rc::Rc;

    use kinetic::drag::DragState;

    let state = Rc::new(DragState::new());
    let toolkit = Toolkit::builder()
        .with_drag_and_drop(state.clone())
        .build(&HeadlessHost)
        .unwrap();

    let shape = Node::shape(&toolkit, NodeConfig::new());
    state.arm(shape.node_id());
    state.start();
    assert!(toolkit.is_dragging());
    assert!(toolkit.is_drag_ready());
}

// ============================================================================
// Node Creation
// ============================================================================

#[test]
fn creation_registers_id_and_name() {
    let toolkit = new_toolkit();
    let shape = Node::shape(&toolkit, NodeConfig::new().with_id("hero").with_name("actor"));

    assert_eq!(toolkit.find("#hero"), vec![shape.clone()]);
    assert_eq!(toolkit.find(".actor"), vec![shape]);
}

#[test]
fn node_ids_are_distinct() {
    let toolkit = new_toolkit();
    let a = Node::group(&toolkit, NodeConfig::new());
    let b = Node::group(&toolkit, NodeConfig::new());
    assert_ne!(a.node_id(), b.node_id());
}

#[test]
fn stages_join_stage_list_and_own_a_canvas() {
    let toolkit = new_toolkit();
    let first = Node::stage(&toolkit, NodeConfig::new()).unwrap();
    let second = Node::stage(&toolkit, NodeConfig::new()).unwrap();

    assert_eq!(toolkit.stages(), vec![first.clone(), second]);
    assert_eq!(first.kind(), NodeKind::Stage);
    assert_eq!(first.with_canvas(|c| c.is_headless()), Some(true));
}

#[test]
fn layers_own_a_canvas_but_groups_do_not() {
    let toolkit = new_toolkit();
    let layer = Node::layer(&toolkit, NodeConfig::new()).unwrap();
    let group = Node::group(&toolkit, NodeConfig::new());

    assert_eq!(layer.with_canvas(|c| (c.width(), c.height())), Some((300, 150)));
    assert!(group.with_canvas(|_| ()).is_none());
}

#[test]
fn shapes_get_unique_color_keys() {
    let toolkit = new_toolkit();
    let a = Node::shape(&toolkit, NodeConfig::new());
    let b = Node::shape(&toolkit, NodeConfig::new());
    let group = Node::group(&toolkit, NodeConfig::new());

    let (ka, kb) = (a.color_key().unwrap(), b.color_key().unwrap());
    assert_ne!(ka, kb);
    assert!(group.color_key().is_none());
    assert_eq!(toolkit.registry().borrow().shape(ka), Some(&a));
}

// ============================================================================
// Attribute Changes
// ============================================================================

#[test]
fn set_id_moves_the_entry() {
    let toolkit = new_toolkit();
    let node = Node::group(&toolkit, NodeConfig::new().with_id("old"));

    node.set_id(Some("new"));
    assert_eq!(node.id().as_deref(), Some("new"));
    assert!(toolkit.find("#old").is_empty());
    assert_eq!(toolkit.find("#new"), vec![node.clone()]);

    node.set_id(None);
    assert!(toolkit.find("#new").is_empty());
}

#[test]
fn set_name_moves_only_this_node() {
    let toolkit = new_toolkit();
    let a = Node::shape(&toolkit, named("red"));
    let b = Node::shape(&toolkit, named("red"));

    a.set_name(Some("blue"));
    assert_eq!(toolkit.find(".red"), vec![b]);
    assert_eq!(toolkit.find(".blue"), vec![a]);
}

#[test]
fn duplicate_ids_overwrite_previous_owner() {
    let toolkit = new_toolkit();
    let _first = Node::shape(&toolkit, NodeConfig::new().with_id("dup"));
    let second = Node::shape(&toolkit, NodeConfig::new().with_id("dup"));
    assert_eq!(toolkit.find("#dup"), vec![second]);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn add_sets_parent_and_children() {
    let toolkit = new_toolkit();
    let layer = Node::layer(&toolkit, NodeConfig::new()).unwrap();
    let group = Node::group(&toolkit, NodeConfig::new());
    let shape = Node::shape(&toolkit, NodeConfig::new());

    layer.add(&group).unwrap();
    group.add(&shape).unwrap();

    assert_eq!(shape.parent(), Some(group.clone()));
    assert_eq!(layer.children(), vec![group.clone()]);
    assert!(layer.is_ancestor_of(&shape));
    assert!(!shape.is_ancestor_of(&layer));
}

#[test]
fn containment_rules_are_enforced() {
    let toolkit = new_toolkit();
    let stage = Node::stage(&toolkit, NodeConfig::new()).unwrap();
    let other_stage = Node::stage(&toolkit, NodeConfig::new()).unwrap();
    let layer = Node::layer(&toolkit, NodeConfig::new()).unwrap();
    let group = Node::group(&toolkit, NodeConfig::new());
    let shape = Node::shape(&toolkit, NodeConfig::new());

    let rejected = [
        stage.add(&group),
        stage.add(&shape),
        stage.add(&other_stage),
        group.add(&layer),
        layer.add(&stage),
        shape.add(&group),
    ];
    for result in rejected {
        assert!(matches!(result, Err(KineticError::InvalidHierarchy(_))));
    }

    assert!(stage.add(&layer).is_ok());
    assert!(layer.add(&group).is_ok());
    assert!(group.add(&shape).is_ok());
}

#[test]
fn cycles_are_rejected() {
    let toolkit = new_toolkit();
    let outer = Node::group(&toolkit, NodeConfig::new());
    let inner = Node::group(&toolkit, NodeConfig::new());
    outer.add(&inner).unwrap();

    assert!(inner.add(&outer).is_err());
    assert!(outer.add(&outer).is_err());
}

#[test]
fn add_moves_node_between_parents() {
    let toolkit = new_toolkit();
    let first = Node::group(&toolkit, NodeConfig::new());
    let second = Node::group(&toolkit, NodeConfig::new());
    let shape = Node::shape(&toolkit, NodeConfig::new());

    first.add(&shape).unwrap();
    second.add(&shape).unwrap();

    assert!(first.children().is_empty());
    assert_eq!(shape.parent(), Some(second));
}

#[test]
fn remove_detaches_but_keeps_registration() {
    let toolkit = new_toolkit();
    let group = Node::group(&toolkit, NodeConfig::new());
    let shape = Node::shape(&toolkit, NodeConfig::new().with_id("kept"));
    group.add(&shape).unwrap();

    shape.remove();
    assert!(shape.parent().is_none());
    assert!(group.children().is_empty());
    assert_eq!(toolkit.find("#kept"), vec![shape]);
}

#[test]
fn destroy_unregisters_whole_subtree() {
    let toolkit = new_toolkit();
    let stage = Node::stage(&toolkit, NodeConfig::new().with_id("stage")).unwrap();
    let layer = Node::layer(&toolkit, named("layer")).unwrap();
    let shape = Node::shape(&toolkit, NodeConfig::new().with_id("s").with_name("dot"));
    stage.add(&layer).unwrap();
    layer.add(&shape).unwrap();
    let key = shape.color_key().unwrap();

    stage.destroy();

    assert!(toolkit.stages().is_empty());
    assert!(toolkit.find("#stage").is_empty());
    assert!(toolkit.find(".layer").is_empty());
    assert!(toolkit.find("#s").is_empty());
    assert!(toolkit.find(".dot").is_empty());
    assert!(toolkit.registry().borrow().shape(key).is_none());
    assert!(shape.color_key().is_none());
}

#[test]
fn destroy_leaves_siblings_with_same_name() {
    let toolkit = new_toolkit();
    let a = Node::shape(&toolkit, named("twin"));
    let b = Node::shape(&toolkit, named("twin"));

    a.destroy();
    assert_eq!(toolkit.find(".twin"), vec![b]);
}

#[test]
fn get_is_scoped_to_descendants() {
    let toolkit = new_toolkit();
    let left = Node::group(&toolkit, NodeConfig::new());
    let right = Node::group(&toolkit, NodeConfig::new());
    let inside = Node::shape(&toolkit, named("item"));
    let outside = Node::shape(&toolkit, named("item"));
    left.add(&inside).unwrap();
    right.add(&outside).unwrap();

    assert_eq!(left.get(".item"), vec![inside]);
    assert_eq!(right.get(".item"), vec![outside]);
    assert!(left.get("#nothing").is_empty());
}

// ============================================================================
// Independent Toolkits
// ============================================================================

#[test]
fn toolkits_do_not_share_registries() {
    let a = new_toolkit();
    let b = new_toolkit();
    let _node = Node::group(&a, NodeConfig::new().with_id("only-in-a"));

    assert_eq!(a.find("#only-in-a").len(), 1);
    assert!(b.find("#only-in-a").is_empty());
}

#[test]
fn nodes_outliving_their_toolkit_stay_usable() {
    let toolkit = new_toolkit();
    let group = Node::group(&toolkit, NodeConfig::new().with_id("g"));
    let shape = Node::shape(&toolkit, NodeConfig::new());
    drop(toolkit);

    group.set_id(Some("renamed"));
    assert_eq!(group.id().as_deref(), Some("renamed"));
    group.add(&shape).unwrap();
    assert!(group.get("#renamed").is_empty());
    group.destroy();
    assert!(shape.parent().is_none());
}
