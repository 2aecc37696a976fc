//! Rig lifecycle manager.
//!
//! [`Viewer`] owns the single rendering application and the single loaded
//! rig, and wires every controller to the bus. Handlers are attached as one
//! disposer set and removed in bulk on teardown; after disposal a fresh
//! [`Viewer::attach`] re-arms the manager for the next load.
//!
//! Internally the state sits behind `Rc<RefCell<_>>` so bus closures can
//! reach it. Handler methods return the events they want published and the
//! closures dispatch them after the borrow ends, so a UI reaction that
//! dispatches straight back at the core never observes a held borrow.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rigview_api_core::{
    AppOptions, BlendEntry, Color, DebugToggle, Event, EventKind, FilesLoadedData, PlayRequest,
    Point, RenderApp, RenderBackend, RigError, RigHandle, RigInfo,
};

use crate::assets::stage_rig_assets;
use crate::bus::{EventBus, SubscriptionSet};
use crate::config::ViewerConfig;
use crate::overlay::OverlayController;
use crate::playback::PlaybackController;
use crate::viewport::ViewportController;

/// Lifecycle of the managed rig/application pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Live,
    Disposed,
}

struct ViewerState {
    backend: Box<dyn RenderBackend>,
    config: ViewerConfig,
    lifecycle: Lifecycle,
    app: Option<Box<dyn RenderApp>>,
    rig: Option<Box<dyn RigHandle>>,
    playback: PlaybackController,
    viewport: ViewportController,
    overlay: OverlayController,
    subscriptions: SubscriptionSet,
}

/// The viewer core: one backend, one bus, at most one live rig.
pub struct Viewer {
    state: Rc<RefCell<ViewerState>>,
    bus: EventBus,
}

impl Viewer {
    pub fn new(backend: Box<dyn RenderBackend>, bus: EventBus, config: ViewerConfig) -> Self {
        let state = ViewerState {
            backend,
            playback: PlaybackController::new(config.max_tracks),
            viewport: ViewportController::new(&config),
            overlay: OverlayController::new(),
            config,
            lifecycle: Lifecycle::Uninitialized,
            app: None,
            rig: None,
            subscriptions: SubscriptionSet::new(),
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            bus,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.borrow().lifecycle
    }

    pub fn is_live(&self) -> bool {
        self.lifecycle() == Lifecycle::Live
    }

    pub fn is_attached(&self) -> bool {
        !self.state.borrow().subscriptions.is_empty()
    }

    /// Pending draw-call statistics, for hosts that render them elsewhere.
    pub fn draw_call_stats(&self) -> crate::overlay::DrawCallStats {
        self.state.borrow().overlay.stats()
    }

    /// Register every control handler on the bus. Idempotent; called again
    /// after a disposal it re-arms the manager for the next load.
    pub fn attach(&self) {
        {
            let mut state = self.state.borrow_mut();
            if !state.subscriptions.is_empty() {
                return;
            }
            if state.lifecycle == Lifecycle::Disposed {
                state.lifecycle = Lifecycle::Uninitialized;
            }
        }

        let mut subs = SubscriptionSet::new();

        subs.push(self.handler(EventKind::StartAnimation, |state, event| {
            if let Event::StartAnimation(request) = event {
                state.on_start_animation(request);
            }
        }));
        subs.push(self.handler(EventKind::SetSkin, |state, event| {
            if let Event::SetSkin { name } = event {
                state.on_set_skin(name);
            }
        }));
        subs.push(self.handler(EventKind::SetBlend, |state, event| {
            if let Event::SetBlend(entry) = event {
                state.on_set_blend(entry);
            }
        }));
        subs.push(self.handler(EventKind::SetDefaultBlend, |state, event| {
            if let Event::SetDefaultBlend { duration } = event {
                state.on_set_default_blend(*duration);
            }
        }));
        subs.push(self.handler(EventKind::SetBackground, |state, event| {
            if let Event::SetBackground { hex } = event {
                state.on_set_background(hex);
            }
        }));
        subs.push(self.handler(EventKind::SetScreenVisible, |state, event| {
            if let Event::SetScreenVisible { visible } = event {
                state.on_set_screen_visible(*visible);
            }
        }));
        subs.push(self.handler(EventKind::PlayTimeline, |state, event| {
            if let Event::PlayTimeline { animations } = event {
                state.on_play_timeline(animations);
            }
        }));
        subs.push(self.handler(EventKind::SetDebugOption, |state, event| {
            if let Event::SetDebugOption(toggle) = event {
                state.on_set_debug_option(toggle);
            }
        }));
        subs.push(self.handler(EventKind::SetupPose, |state, _| {
            state.on_setup_pose();
        }));
        subs.push(self.handler(EventKind::DestroyApp, |state, _| {
            state.dispose_internal();
        }));

        // files-loaded needs the bus for the rig-created re-dispatch, so it
        // does not go through the plain handler helper
        let weak = Rc::downgrade(&self.state);
        let bus = self.bus.clone();
        subs.push(self.bus.subscribe(EventKind::FilesLoaded, move |event| {
            let Event::FilesLoaded(data) = event else {
                return;
            };
            if let Err(err) = Self::load_files_inner(&weak, &bus, data) {
                // a bus dispatch cannot return the failure to its
                // dispatcher; the loading collaborator owns recovery
                log::error!("rig initialization failed: {err}");
            }
        }));

        self.state.borrow_mut().subscriptions = subs;
    }

    fn handler(
        &self,
        kind: EventKind,
        apply: impl Fn(&mut ViewerState, &Event) + 'static,
    ) -> crate::bus::Subscription {
        let weak = Rc::downgrade(&self.state);
        self.bus.subscribe(kind, move |event| {
            if let Some(state) = weak.upgrade() {
                apply(&mut state.borrow_mut(), event);
            }
        })
    }

    /// Construct the application and rig from a loaded file set.
    ///
    /// Re-attaches the bus handlers first when a disposal removed them, so a
    /// rig brought live through this path always has its control events
    /// wired. This is the `Result` path for the loading collaborator; asset
    /// errors propagate and must be surfaced to the user upstream. Returns
    /// `Ok(None)` when a rig is already live (the load is ignored).
    pub fn load_files(&self, data: &FilesLoadedData) -> Result<Option<RigInfo>, RigError> {
        self.attach();
        Self::load_files_inner(&Rc::downgrade(&self.state), &self.bus, data)
    }

    fn load_files_inner(
        state: &Weak<RefCell<ViewerState>>,
        bus: &EventBus,
        data: &FilesLoadedData,
    ) -> Result<Option<RigInfo>, RigError> {
        let Some(state) = state.upgrade() else {
            return Ok(None);
        };
        let info = state.borrow_mut().init_from_files(data)?;
        if let Some(info) = &info {
            bus.dispatch(&Event::RigCreated(info.clone()));
        }
        Ok(info)
    }

    /// Tear everything down. Idempotent; equivalent to a destroy-app event.
    pub fn dispose(&self) {
        self.state.borrow_mut().dispose_internal();
    }

    /// Per-frame step: advances the rig, routes its track events (timeline
    /// advancement, marker re-dispatch), and publishes draw-call stats.
    pub fn tick(&self, dt: f32) {
        let outbound = self.state.borrow_mut().tick_internal(dt);
        for event in outbound {
            self.bus.dispatch(&event);
        }
    }

    // Host-wired interaction entry points. All of them are silent no-ops
    // unless a rig is live.

    pub fn pointer_down(&self, at: Point) {
        self.state.borrow_mut().on_pointer_down(at);
    }

    pub fn pointer_move(&self, at: Point) {
        self.state.borrow_mut().on_pointer_move(at);
    }

    pub fn pointer_up(&self) {
        self.state.borrow_mut().on_pointer_up();
    }

    pub fn wheel(&self, delta_y: f32) {
        self.state.borrow_mut().on_wheel(delta_y);
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.state.borrow_mut().on_resize(width, height);
    }
}

impl ViewerState {
    /// Uninitialized → Initializing → Live. A second load while a rig is
    /// live is ignored (at-most-one-rig invariant); a failure rolls the
    /// lifecycle back so a corrected load can retry.
    fn init_from_files(&mut self, data: &FilesLoadedData) -> Result<Option<RigInfo>, RigError> {
        if self.lifecycle == Lifecycle::Live {
            log::debug!("ignoring files-loaded while a rig is live");
            return Ok(None);
        }

        self.lifecycle = Lifecycle::Initializing;
        match self.build_live(data) {
            Ok(info) => {
                self.lifecycle = Lifecycle::Live;
                Ok(Some(info))
            }
            Err(err) => {
                self.lifecycle = Lifecycle::Uninitialized;
                Err(err)
            }
        }
    }

    fn build_live(&mut self, data: &FilesLoadedData) -> Result<RigInfo, RigError> {
        let assets = stage_rig_assets(data)?;

        let background = Color::from_hex(&data.canvas_background)
            .unwrap_or(self.config.fallback_background);
        let options = AppOptions {
            width: self.config.surface_width,
            height: self.config.surface_height,
            background,
            antialias: self.config.antialias,
        };

        let mut app = self.backend.create_app(&options)?;
        let mut rig = app.create_rig(&assets)?;

        app.set_surface_hidden(false);
        app.set_background(background);
        self.overlay.install(app.as_mut(), &self.config.overlay);

        // center the rig in the viewport, axes with it
        let (width, height) = app.surface_size();
        let (center_x, center_y) = (width as f32 / 2.0, height as f32 / 2.0);
        rig.set_position(center_x, center_y);
        app.set_axes_origin(center_x, center_y);

        let info = RigInfo {
            animations: rig.animations(),
            skins: rig.skins(),
        };
        log::info!(
            "rig live: {} animations, {} skins",
            info.animations.len(),
            info.skins.len()
        );

        self.app = Some(app);
        self.rig = Some(rig);
        Ok(info)
    }

    /// Live → Disposed. Safe to call in any state, any number of times.
    fn dispose_internal(&mut self) {
        self.rig = None;
        if let Some(mut app) = self.app.take() {
            app.set_surface_hidden(true);
            app.destroy();
        }
        self.playback.reset();
        self.viewport.reset();
        self.overlay.reset();
        self.subscriptions.dispose_all();
        self.lifecycle = Lifecycle::Disposed;
    }

    fn tick_internal(&mut self, dt: f32) -> Vec<Event> {
        let mut outbound = Vec::new();
        if self.lifecycle != Lifecycle::Live {
            return outbound;
        }
        if let (Some(rig), Some(app)) = (self.rig.as_mut(), self.app.as_mut()) {
            for track_event in rig.update(dt) {
                if let Some(event) = self.playback.on_track_event(rig.as_mut(), &track_event) {
                    outbound.push(event);
                }
            }
            self.overlay.on_frame(app.as_mut());
        }
        outbound
    }

    fn on_start_animation(&mut self, request: &PlayRequest) {
        if let Some(rig) = self.rig.as_deref_mut() {
            self.playback.start_animation(rig, request);
        }
    }

    fn on_set_skin(&mut self, name: &str) {
        if let Some(rig) = self.rig.as_deref_mut() {
            self.playback.set_skin(rig, name);
        }
    }

    fn on_set_blend(&mut self, entry: &BlendEntry) {
        if let Some(rig) = self.rig.as_deref_mut() {
            self.playback.set_blend(rig, entry);
        }
    }

    fn on_set_default_blend(&mut self, duration: f32) {
        if let Some(rig) = self.rig.as_deref_mut() {
            self.playback.set_default_blend(rig, duration);
        }
    }

    fn on_set_background(&mut self, hex: &str) {
        let Some(app) = self.app.as_deref_mut() else {
            return;
        };
        match Color::from_hex(hex) {
            Ok(color) => app.set_background(color),
            Err(err) => log::warn!("ignoring background change: {err}"),
        }
    }

    fn on_set_screen_visible(&mut self, visible: bool) {
        if let Some(app) = self.app.as_deref_mut() {
            self.overlay.set_screen_visible(app, visible);
        }
    }

    fn on_play_timeline(&mut self, animations: &[String]) {
        if let Some(rig) = self.rig.as_deref_mut() {
            self.playback.play_timeline(rig, animations);
        }
    }

    fn on_set_debug_option(&mut self, toggle: &DebugToggle) {
        if let Some(rig) = self.rig.as_deref_mut() {
            self.overlay.set_debug_option(rig, toggle);
        }
    }

    fn on_setup_pose(&mut self) {
        if let Some(rig) = self.rig.as_deref_mut() {
            self.playback.setup_pose(rig);
        }
    }

    fn on_pointer_down(&mut self, at: Point) {
        if self.lifecycle != Lifecycle::Live {
            return;
        }
        if let Some(rig) = self.rig.as_deref_mut() {
            self.viewport.pointer_down(rig, at);
        }
    }

    fn on_pointer_move(&mut self, at: Point) {
        if self.lifecycle != Lifecycle::Live {
            return;
        }
        if let (Some(rig), Some(app)) = (self.rig.as_deref_mut(), self.app.as_deref_mut()) {
            self.viewport.pointer_move(rig, app, at);
        }
    }

    fn on_pointer_up(&mut self) {
        if let Some(rig) = self.rig.as_deref_mut() {
            self.viewport.pointer_up(rig);
        }
    }

    fn on_wheel(&mut self, delta_y: f32) {
        if self.lifecycle != Lifecycle::Live {
            return;
        }
        if let Some(rig) = self.rig.as_deref_mut() {
            self.viewport.wheel(rig, delta_y);
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if self.lifecycle != Lifecycle::Live {
            return;
        }
        if let Some(app) = self.app.as_deref_mut() {
            self.viewport.resize(app, width, height);
        }
    }
}
