use rigview_core::{Event, EventBus, Point, Viewer, ViewerConfig};
use rigview_test_fixtures::{files_loaded, MockBackend, MockHandle};

/// 400x400 surface so the rig lands at (200, 200).
fn live_viewer() -> (Viewer, MockHandle) {
    let backend = MockBackend::new();
    let handle = backend.handle();
    let config = ViewerConfig {
        surface_width: 400,
        surface_height: 400,
        ..ViewerConfig::default()
    };
    let viewer = Viewer::new(Box::new(backend), EventBus::new(), config);
    viewer.attach();
    viewer
        .bus()
        .dispatch(&Event::FilesLoaded(files_loaded("#e4eaf0")));
    assert!(viewer.is_live());
    (viewer, handle)
}

#[test]
fn drag_moves_rig_by_pointer_delta() {
    let (viewer, handle) = live_viewer();
    assert_eq!(handle.position(), (200.0, 200.0));

    viewer.pointer_down(Point::new(100.0, 100.0));
    assert_eq!(handle.alpha(), 0.5);

    viewer.pointer_move(Point::new(140.0, 130.0));
    assert_eq!(handle.position(), (240.0, 230.0));
    assert_eq!(handle.axes_origin(), (240.0, 230.0));

    viewer.pointer_up();
    assert_eq!(handle.alpha(), 1.0);
    assert_eq!(handle.position(), (240.0, 230.0));
}

#[test]
fn move_without_down_is_ignored() {
    let (viewer, handle) = live_viewer();
    viewer.pointer_move(Point::new(999.0, 999.0));
    assert_eq!(handle.position(), (200.0, 200.0));
    assert_eq!(handle.alpha(), 1.0);
}

#[test]
fn pointer_up_without_drag_is_harmless() {
    let (viewer, handle) = live_viewer();
    viewer.pointer_up();
    assert_eq!(handle.alpha(), 1.0);
}

#[test]
fn wheel_steps_scale_both_ways() {
    let (viewer, handle) = live_viewer();
    assert_eq!(handle.scale(), (1.0, 1.0));

    viewer.wheel(-1.0);
    assert_eq!(handle.scale(), (1.2, 1.2));

    viewer.wheel(1.0);
    assert_eq!(handle.scale(), (1.0, 1.0));
}

#[test]
fn zoom_out_floors_above_zero() {
    let (viewer, handle) = live_viewer();
    for _ in 0..10 {
        viewer.wheel(1.0);
    }
    let (x, y) = handle.scale();
    assert!((x - 0.02).abs() < 1e-6);
    assert_eq!(x, y);
}

#[test]
fn wheel_is_ignored_mid_drag() {
    let (viewer, handle) = live_viewer();
    viewer.pointer_down(Point::new(100.0, 100.0));
    viewer.wheel(-1.0);
    assert_eq!(handle.scale(), (1.0, 1.0));

    viewer.pointer_up();
    viewer.wheel(-1.0);
    assert_eq!(handle.scale(), (1.2, 1.2));
}

#[test]
fn resize_changes_surface_only() {
    let (viewer, handle) = live_viewer();
    viewer.resize(800, 600);
    assert_eq!(handle.surface_size(), (800, 600));
    assert_eq!(handle.position(), (200.0, 200.0));
    assert_eq!(handle.scale(), (1.0, 1.0));
}

#[test]
fn gestures_before_init_do_nothing() {
    let backend = MockBackend::new();
    let handle = backend.handle();
    let viewer = Viewer::new(
        Box::new(backend),
        EventBus::new(),
        ViewerConfig::default(),
    );
    viewer.attach();

    viewer.pointer_down(Point::new(10.0, 10.0));
    viewer.pointer_move(Point::new(20.0, 20.0));
    viewer.pointer_up();
    viewer.wheel(-1.0);
    viewer.resize(10, 10);

    assert!(!viewer.is_live());
    assert_eq!(handle.apps_created(), 0);
}

#[test]
fn drag_state_does_not_survive_disposal() {
    let (viewer, handle) = live_viewer();
    viewer.pointer_down(Point::new(100.0, 100.0));
    viewer.dispose();
    assert!(!handle.rig_alive());

    // a stray move after teardown must not touch anything
    viewer.pointer_move(Point::new(500.0, 500.0));
    assert_eq!(handle.position(), (200.0, 200.0));
}
