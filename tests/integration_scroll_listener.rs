use block_ui::config::BlockProps;
use block_ui::controller::BlockUi;
use block_ui::dom::{Document, NodeId};
use block_ui::host::BlockRefs;
use block_ui::scroll::ScrollBus;
use block_ui::viewport::ViewportTracker;

#[test]
fn attach_twice_detach_once_leaves_no_listener() {
    let mut bus = ScrollBus::new();
    let mut tracker = ViewportTracker::new();
    let first = tracker.attach(&mut bus);
    let second = tracker.attach(&mut bus);
    assert_eq!(first, second);
    assert_eq!(bus.listener_count(), 1);
    tracker.detach(&mut bus);
    assert_eq!(bus.listener_count(), 0);
    assert!(bus.dispatch().is_empty());
    // detaching again is harmless
    tracker.detach(&mut bus);
    assert!(!tracker.is_attached());
}

#[test]
fn controller_holds_one_listener_across_updates() {
    let mut doc = Document::new(10.0);
    let body = doc.body();
    let root = doc.create_element(body, false).unwrap();
    let container = doc.create_element(root, false).unwrap();
    let helper = doc.create_element(root, false).unwrap();
    doc.set_layout(container, 0.0, 30.0).unwrap();
    let mut bus = ScrollBus::new();
    let other = bus.subscribe();
    let mut ui: BlockUi<NodeId> = BlockUi::new(BlockProps::default().keep_in_view(true));
    *ui.refs_mut() = BlockRefs {
        container: Some(container),
        helper: Some(helper),
        ..BlockRefs::default()
    };

    for _ in 0..3 {
        let props = ui.props().clone().blocking(true);
        ui.update(props, &mut doc, &mut bus);
    }
    assert_eq!(bus.listener_count(), 2);
    let mine = ui.listener().unwrap();
    assert_eq!(bus.dispatch(), vec![other, mine]);

    let props = ui.props().clone().blocking(false);
    ui.update(props, &mut doc, &mut bus);
    assert_eq!(ui.listener(), None);
    assert_eq!(bus.dispatch(), vec![other]);

    let props = ui.props().clone().blocking(true);
    ui.update(props, &mut doc, &mut bus);
    ui.unmount(&mut bus);
    ui.unmount(&mut bus);
    assert_eq!(bus.dispatch(), vec![other]);
}
