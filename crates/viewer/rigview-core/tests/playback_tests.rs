use std::cell::RefCell;
use std::rc::Rc;

use rigview_api_core::{BlendEntry, PlayRequest, TrackEvent};
use rigview_core::{Event, EventBus, EventKind, Viewer, ViewerConfig};
use rigview_test_fixtures::{files_loaded, MockBackend, MockHandle, RigCall};

const DT: f32 = 1.0 / 60.0;

fn live_viewer() -> (Viewer, MockHandle) {
    let backend = MockBackend::new();
    let handle = backend.handle();
    let viewer = Viewer::new(Box::new(backend), EventBus::new(), ViewerConfig::default());
    viewer.attach();
    viewer
        .bus()
        .dispatch(&Event::FilesLoaded(files_loaded("#e4eaf0")));
    assert!(viewer.is_live());
    handle.clear_calls();
    (viewer, handle)
}

fn start(viewer: &Viewer, animation: &str, looped: bool, track: Option<usize>) {
    viewer.bus().dispatch(&Event::StartAnimation(PlayRequest {
        animation: animation.into(),
        looped,
        track,
    }));
}

#[test]
fn start_animation_clears_resets_then_plays() {
    let (viewer, handle) = live_viewer();
    start(&viewer, "walk", true, None);

    assert_eq!(
        handle.calls(),
        vec![
            RigCall::ClearTrack(0),
            RigCall::SetupPose,
            RigCall::SetAnimation {
                track: 0,
                name: "walk".into(),
                looped: true,
            },
        ]
    );
    assert_eq!(handle.track(0), Some(("walk".into(), true)));
}

#[test]
fn empty_animation_name_stops_the_track() {
    let (viewer, handle) = live_viewer();
    start(&viewer, "walk", true, None);
    start(&viewer, "", false, None);

    assert_eq!(handle.track(0), None);
    // stop clears and resets but never starts anything
    assert!(!handle.calls()[3..]
        .iter()
        .any(|c| matches!(c, RigCall::SetAnimation { .. })));
}

#[test]
fn tracks_are_independent_and_bounded() {
    let (viewer, handle) = live_viewer();
    start(&viewer, "walk", true, Some(0));
    start(&viewer, "run", false, Some(5));
    assert_eq!(handle.track(0), Some(("walk".into(), true)));
    assert_eq!(handle.track(5), Some(("run".into(), false)));

    handle.clear_calls();
    start(&viewer, "idle", false, Some(6));
    assert!(handle.calls().is_empty());
    assert_eq!(handle.track_count(), 2);
}

#[test]
fn skin_switch_keeps_playback() {
    let (viewer, handle) = live_viewer();
    start(&viewer, "walk", true, None);
    viewer.bus().dispatch(&Event::SetSkin {
        name: "default".into(),
    });
    assert_eq!(handle.active_skin().as_deref(), Some("default"));
    assert_eq!(handle.track(0), Some(("walk".into(), true)));
}

#[test]
fn explicit_blend_beats_default() {
    let (viewer, handle) = live_viewer();
    viewer.bus().dispatch(&Event::SetBlend(BlendEntry {
        from_anim: "walk".into(),
        to_anim: "run".into(),
        duration: 0.3,
    }));
    viewer
        .bus()
        .dispatch(&Event::SetDefaultBlend { duration: 1.0 });

    assert_eq!(handle.blend("walk", "run"), 0.3);
    assert_eq!(handle.blend("run", "idle"), 1.0);
    assert_eq!(handle.blend("idle", "walk"), 1.0);
}

#[test]
fn negative_blend_durations_clamp_to_zero() {
    let (viewer, handle) = live_viewer();
    viewer.bus().dispatch(&Event::SetBlend(BlendEntry {
        from_anim: "walk".into(),
        to_anim: "run".into(),
        duration: -0.5,
    }));
    viewer
        .bus()
        .dispatch(&Event::SetDefaultBlend { duration: -1.0 });

    assert_eq!(handle.blend("walk", "run"), 0.0);
    assert_eq!(handle.default_blend(), 0.0);
}

#[test]
fn timeline_plays_entries_back_to_back() {
    let (viewer, handle) = live_viewer();
    viewer.bus().dispatch(&Event::PlayTimeline {
        animations: vec!["walk".into(), "run".into(), "idle".into()],
    });
    assert_eq!(handle.track(0), Some(("walk".into(), false)));

    handle.push_track_event(TrackEvent::Completed {
        track: 0,
        animation: "walk".into(),
    });
    viewer.tick(DT);
    assert_eq!(handle.track(0), Some(("run".into(), false)));

    handle.push_track_event(TrackEvent::Completed {
        track: 0,
        animation: "run".into(),
    });
    viewer.tick(DT);
    assert_eq!(handle.track(0), Some(("idle".into(), false)));

    // exhausting the queue leaves the last entry in place
    handle.clear_calls();
    handle.push_track_event(TrackEvent::Completed {
        track: 0,
        animation: "idle".into(),
    });
    viewer.tick(DT);
    assert!(handle.calls().is_empty());
    assert_eq!(handle.track(0), Some(("idle".into(), false)));
}

#[test]
fn empty_timeline_is_a_no_op() {
    let (viewer, handle) = live_viewer();
    start(&viewer, "walk", true, None);
    handle.clear_calls();

    viewer.bus().dispatch(&Event::PlayTimeline { animations: vec![] });
    assert!(handle.calls().is_empty());
    assert_eq!(handle.track(0), Some(("walk".into(), true)));
}

#[test]
fn markers_are_redispatched_while_playing() {
    let (viewer, handle) = live_viewer();
    let fired: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let _sub = viewer.bus().subscribe(EventKind::RigEvent, move |event| {
        if let Event::RigEvent { name } = event {
            sink.borrow_mut().push(name.clone());
        }
    });

    start(&viewer, "walk", true, None);
    handle.push_track_event(TrackEvent::Marker {
        track: 0,
        name: "footstep".into(),
    });
    viewer.tick(DT);
    assert_eq!(*fired.borrow(), vec!["footstep".to_string()]);
}

#[test]
fn setup_pose_cancels_the_timeline_and_markers() {
    let (viewer, handle) = live_viewer();
    let fired: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let _sub = viewer.bus().subscribe(EventKind::RigEvent, move |event| {
        if let Event::RigEvent { name } = event {
            sink.borrow_mut().push(name.clone());
        }
    });

    viewer.bus().dispatch(&Event::PlayTimeline {
        animations: vec!["walk".into(), "run".into()],
    });
    viewer.bus().dispatch(&Event::SetupPose);
    assert_eq!(handle.track(0), None);
    assert!(handle.setup_pose_calls() >= 2);

    // stale rig events arriving after the reset are dropped, not forwarded
    handle.push_track_event(TrackEvent::Completed {
        track: 0,
        animation: "walk".into(),
    });
    handle.push_track_event(TrackEvent::Marker {
        track: 0,
        name: "footstep".into(),
    });
    viewer.tick(DT);
    assert_eq!(handle.track(0), None);
    assert!(fired.borrow().is_empty());
}
