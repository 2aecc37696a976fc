//! Recording mock of the rendering backend traits.
//!
//! [`MockBackend`] hands the viewer core a fully scripted application and
//! rig whose every mutation lands in one shared world, inspectable through
//! the [`MockHandle`] the test keeps. Track events are staged by the test
//! and drained by the next `update` call, so completion/marker routing can
//! be driven deterministically.

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use serde::Deserialize;

use rigview_api_core::{
    AppOptions, Color, DebugFlag, OverlaySpec, RenderApp, RenderBackend, RigAssets, RigError,
    RigHandle, RigInfo, SkeletonSource, TrackEvent,
};

/// Ordered log of the rig mutations whose sequencing tests care about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RigCall {
    ClearTrack(usize),
    SetupPose,
    SetAnimation {
        track: usize,
        name: String,
        looped: bool,
    },
}

struct AppState {
    width: u32,
    height: u32,
    background: Color,
    background_visible: bool,
    overlays_installed: bool,
    overlays_visible: bool,
    axes_origin: (f32, f32),
    stats_text: String,
    pending_draw_calls: u64,
    surface_hidden: bool,
    destroyed: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            background: Color(0),
            background_visible: true,
            overlays_installed: false,
            overlays_visible: false,
            axes_origin: (0.0, 0.0),
            stats_text: String::new(),
            pending_draw_calls: 0,
            surface_hidden: true,
            destroyed: false,
        }
    }
}

struct RigState {
    animations: Vec<String>,
    skins: Vec<String>,
    tracks: HashMap<usize, (String, bool)>,
    mixes: HashMap<(String, String), f32>,
    default_mix: f32,
    position: (f32, f32),
    scale: (f32, f32),
    alpha: f32,
    active_skin: Option<String>,
    debug_flags: HashMap<String, bool>,
    setup_pose_calls: usize,
    updates: usize,
}

impl RigState {
    fn new(animations: Vec<String>, skins: Vec<String>) -> Self {
        Self {
            animations,
            skins,
            tracks: HashMap::new(),
            mixes: HashMap::new(),
            default_mix: 0.0,
            position: (0.0, 0.0),
            scale: (1.0, 1.0),
            alpha: 1.0,
            active_skin: None,
            debug_flags: HashMap::new(),
            setup_pose_calls: 0,
            updates: 0,
        }
    }
}

#[derive(Default)]
struct World {
    apps_created: usize,
    app: AppState,
    rig: Option<RigState>,
    rig_alive: bool,
    staged_events: Vec<TrackEvent>,
    calls: Vec<RigCall>,
}

/// The test's window into the mock world. Clones share the same world.
#[derive(Clone)]
pub struct MockHandle {
    world: Rc<RefCell<World>>,
}

impl MockHandle {
    pub fn apps_created(&self) -> usize {
        self.world.borrow().apps_created
    }

    /// Whether the boxed rig handle the viewer owns is still alive.
    pub fn rig_alive(&self) -> bool {
        self.world.borrow().rig_alive
    }

    pub fn app_destroyed(&self) -> bool {
        self.world.borrow().app.destroyed
    }

    pub fn surface_hidden(&self) -> bool {
        self.world.borrow().app.surface_hidden
    }

    pub fn surface_size(&self) -> (u32, u32) {
        let world = self.world.borrow();
        (world.app.width, world.app.height)
    }

    pub fn background(&self) -> Color {
        self.world.borrow().app.background
    }

    pub fn background_visible(&self) -> bool {
        self.world.borrow().app.background_visible
    }

    pub fn overlays_installed(&self) -> bool {
        self.world.borrow().app.overlays_installed
    }

    pub fn overlays_visible(&self) -> bool {
        self.world.borrow().app.overlays_visible
    }

    pub fn axes_origin(&self) -> (f32, f32) {
        self.world.borrow().app.axes_origin
    }

    pub fn stats_text(&self) -> String {
        self.world.borrow().app.stats_text.clone()
    }

    pub fn position(&self) -> (f32, f32) {
        self.with_rig(|rig| rig.position)
    }

    pub fn scale(&self) -> (f32, f32) {
        self.with_rig(|rig| rig.scale)
    }

    pub fn alpha(&self) -> f32 {
        self.with_rig(|rig| rig.alpha)
    }

    pub fn active_skin(&self) -> Option<String> {
        self.with_rig(|rig| rig.active_skin.clone())
    }

    /// Entry playing on a track, if any: `(animation, looped)`.
    pub fn track(&self, track: usize) -> Option<(String, bool)> {
        self.with_rig(|rig| rig.tracks.get(&track).cloned())
    }

    pub fn track_count(&self) -> usize {
        self.with_rig(|rig| rig.tracks.len())
    }

    /// Effective blend duration for a pair: the explicit entry when present,
    /// the default otherwise.
    pub fn blend(&self, from_anim: &str, to_anim: &str) -> f32 {
        self.with_rig(|rig| {
            rig.mixes
                .get(&(from_anim.to_string(), to_anim.to_string()))
                .copied()
                .unwrap_or(rig.default_mix)
        })
    }

    pub fn default_blend(&self) -> f32 {
        self.with_rig(|rig| rig.default_mix)
    }

    pub fn debug_flag(&self, name: &str) -> bool {
        self.with_rig(|rig| rig.debug_flags.get(name).copied().unwrap_or(false))
    }

    pub fn setup_pose_calls(&self) -> usize {
        self.with_rig(|rig| rig.setup_pose_calls)
    }

    pub fn updates(&self) -> usize {
        self.with_rig(|rig| rig.updates)
    }

    pub fn calls(&self) -> Vec<RigCall> {
        self.world.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.world.borrow_mut().calls.clear();
    }

    /// Stage a track event for the next `update` to fire.
    pub fn push_track_event(&self, event: TrackEvent) {
        self.world.borrow_mut().staged_events.push(event);
    }

    /// Set the draw-call counter the next take will observe.
    pub fn set_draw_calls(&self, calls: u64) {
        self.world.borrow_mut().app.pending_draw_calls = calls;
    }

    fn with_rig<T>(&self, read: impl FnOnce(&RigState) -> T) -> T {
        let world = self.world.borrow();
        let rig = world.rig.as_ref().unwrap_or_else(|| {
            panic!("no rig was ever created in the mock world");
        });
        read(rig)
    }
}

/// Backend whose applications and rigs record into a shared world.
pub struct MockBackend {
    world: Rc<RefCell<World>>,
    catalogue: RigInfo,
    fail_create_app: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_catalogue(
            &["idle", "run", "walk"],
            &["default"],
        )
    }

    /// Catalogue reported for rigs built from binary skeletons (which the
    /// mock does not parse). Json skeletons are parsed for real.
    pub fn with_catalogue(animations: &[&str], skins: &[&str]) -> Self {
        Self {
            world: Rc::new(RefCell::new(World::default())),
            catalogue: RigInfo {
                animations: animations.iter().map(|s| s.to_string()).collect(),
                skins: skins.iter().map(|s| s.to_string()).collect(),
            },
            fail_create_app: false,
        }
    }

    /// Make `create_app` fail, for exercising init rollback.
    pub fn failing() -> Self {
        Self {
            fail_create_app: true,
            ..Self::new()
        }
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            world: Rc::clone(&self.world),
        }
    }
}

impl RenderBackend for MockBackend {
    fn create_app(&mut self, options: &AppOptions) -> Result<Box<dyn RenderApp>, RigError> {
        if self.fail_create_app {
            return Err(RigError::backend("mock application refused to start"));
        }
        let mut world = self.world.borrow_mut();
        world.apps_created += 1;
        world.app = AppState {
            width: options.width,
            height: options.height,
            background: options.background,
            ..AppState::default()
        };
        drop(world);
        Ok(Box::new(MockApp {
            world: Rc::clone(&self.world),
            catalogue: self.catalogue.clone(),
        }))
    }
}

struct MockApp {
    world: Rc<RefCell<World>>,
    catalogue: RigInfo,
}

/// Just enough of the skeleton json to list animations and skins. Skins
/// appear either as an object keyed by name or as a list of named entries,
/// depending on the exporter version.
#[derive(Deserialize)]
struct SkeletonDoc {
    #[serde(default)]
    animations: HashMap<String, serde_json::Value>,
    #[serde(default)]
    skins: Option<SkinsField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkinsField {
    List(Vec<SkinRef>),
    Map(HashMap<String, serde_json::Value>),
}

#[derive(Deserialize)]
struct SkinRef {
    name: String,
}

impl SkeletonDoc {
    fn catalogue(self) -> RigInfo {
        let mut animations: Vec<String> = self.animations.into_keys().collect();
        animations.sort();
        let mut skins: Vec<String> = match self.skins {
            Some(SkinsField::List(list)) => list.into_iter().map(|s| s.name).collect(),
            Some(SkinsField::Map(map)) => map.into_keys().collect(),
            None => Vec::new(),
        };
        skins.sort();
        RigInfo { animations, skins }
    }
}

impl RenderApp for MockApp {
    fn create_rig(&mut self, assets: &RigAssets) -> Result<Box<dyn RigHandle>, RigError> {
        let info = match &assets.skeleton {
            SkeletonSource::Json(text) => serde_json::from_str::<SkeletonDoc>(text)
                .map_err(|err| RigError::backend(format!("skeleton json: {err}")))?
                .catalogue(),
            SkeletonSource::Binary(_) => self.catalogue.clone(),
        };
        let mut world = self.world.borrow_mut();
        world.rig = Some(RigState::new(info.animations, info.skins));
        world.rig_alive = true;
        drop(world);
        Ok(Box::new(MockRig {
            world: Rc::clone(&self.world),
        }))
    }

    fn surface_size(&self) -> (u32, u32) {
        let world = self.world.borrow();
        (world.app.width, world.app.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let mut world = self.world.borrow_mut();
        world.app.width = width;
        world.app.height = height;
    }

    fn set_background(&mut self, color: Color) {
        self.world.borrow_mut().app.background = color;
    }

    fn set_background_visible(&mut self, visible: bool) {
        self.world.borrow_mut().app.background_visible = visible;
    }

    fn install_overlays(&mut self, _spec: &OverlaySpec) {
        self.world.borrow_mut().app.overlays_installed = true;
    }

    fn set_overlays_visible(&mut self, visible: bool) {
        self.world.borrow_mut().app.overlays_visible = visible;
    }

    fn set_axes_origin(&mut self, x: f32, y: f32) {
        self.world.borrow_mut().app.axes_origin = (x, y);
    }

    fn set_stats_text(&mut self, text: &str) {
        self.world.borrow_mut().app.stats_text = text.to_string();
    }

    fn take_draw_calls(&mut self) -> u64 {
        std::mem::take(&mut self.world.borrow_mut().app.pending_draw_calls)
    }

    fn set_surface_hidden(&mut self, hidden: bool) {
        self.world.borrow_mut().app.surface_hidden = hidden;
    }

    fn destroy(&mut self) {
        self.world.borrow_mut().app.destroyed = true;
    }
}

struct MockRig {
    world: Rc<RefCell<World>>,
}

impl MockRig {
    fn with_rig<T>(&self, write: impl FnOnce(&mut RigState) -> T) -> T {
        let mut world = self.world.borrow_mut();
        let rig = world
            .rig
            .as_mut()
            .unwrap_or_else(|| panic!("mock rig outlived its world entry"));
        write(rig)
    }
}

impl Drop for MockRig {
    fn drop(&mut self) {
        self.world.borrow_mut().rig_alive = false;
    }
}

impl RigHandle for MockRig {
    fn animations(&self) -> Vec<String> {
        self.with_rig(|rig| rig.animations.clone())
    }

    fn skins(&self) -> Vec<String> {
        self.with_rig(|rig| rig.skins.clone())
    }

    fn set_animation(&mut self, track: usize, name: &str, looped: bool) {
        let mut world = self.world.borrow_mut();
        world.calls.push(RigCall::SetAnimation {
            track,
            name: name.to_string(),
            looped,
        });
        if let Some(rig) = world.rig.as_mut() {
            rig.tracks.insert(track, (name.to_string(), looped));
        }
    }

    fn clear_track(&mut self, track: usize) {
        let mut world = self.world.borrow_mut();
        world.calls.push(RigCall::ClearTrack(track));
        if let Some(rig) = world.rig.as_mut() {
            rig.tracks.remove(&track);
        }
    }

    fn set_to_setup_pose(&mut self) {
        let mut world = self.world.borrow_mut();
        world.calls.push(RigCall::SetupPose);
        if let Some(rig) = world.rig.as_mut() {
            rig.setup_pose_calls += 1;
        }
    }

    fn set_skin(&mut self, name: &str) {
        self.with_rig(|rig| rig.active_skin = Some(name.to_string()));
    }

    fn set_mix(&mut self, from_anim: &str, to_anim: &str, duration: f32) {
        self.with_rig(|rig| {
            rig.mixes
                .insert((from_anim.to_string(), to_anim.to_string()), duration);
        });
    }

    fn set_default_mix(&mut self, duration: f32) {
        self.with_rig(|rig| rig.default_mix = duration);
    }

    fn position(&self) -> (f32, f32) {
        self.with_rig(|rig| rig.position)
    }

    fn set_position(&mut self, x: f32, y: f32) {
        self.with_rig(|rig| rig.position = (x, y));
    }

    fn scale(&self) -> (f32, f32) {
        self.with_rig(|rig| rig.scale)
    }

    fn set_scale(&mut self, x: f32, y: f32) {
        self.with_rig(|rig| rig.scale = (x, y));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.with_rig(|rig| rig.alpha = alpha);
    }

    fn set_debug_flag(&mut self, flag: &DebugFlag, value: bool) {
        self.with_rig(|rig| {
            rig.debug_flags
                .insert(flag.property_name().to_string(), value);
        });
    }

    fn update(&mut self, _dt: f32) -> Vec<TrackEvent> {
        let mut world = self.world.borrow_mut();
        if let Some(rig) = world.rig.as_mut() {
            rig.updates += 1;
        }
        std::mem::take(&mut world.staged_events)
    }
}
