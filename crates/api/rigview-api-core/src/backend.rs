//! Rendering backend boundary.
//!
//! The viewer core never talks to a concrete rendering engine; it drives
//! these traits. A backend adapter wraps the real engine (application,
//! skeletal runtime, GPU resources), while tests substitute a recording mock.
//! Asset parsing lives behind [`RenderApp::create_rig`]: the core only
//! selects the skeleton source and matches texture pages, the runtime does
//! the rest.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::RigError;

/// A point in surface coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// Options for constructing the rendering application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppOptions {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub antialias: bool,
}

/// Skeleton payload, already split by format. Which parser the runtime picks
/// follows from the variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SkeletonSource {
    Json(String),
    Binary(Vec<u8>),
}

impl SkeletonSource {
    pub fn is_binary(&self) -> bool {
        matches!(self, SkeletonSource::Binary(_))
    }
}

/// One atlas page image, resolved against the loaded file set by path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TexturePage {
    pub path: String,
    pub data: Vec<u8>,
}

/// Everything the runtime needs to construct a rig.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigAssets {
    pub skeleton: SkeletonSource,
    pub atlas: String,
    pub pages: Vec<TexturePage>,
}

/// One screen-bound guide rectangle, centered on the rig origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuideRect {
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub thickness: f32,
}

/// The always-constructed, visibility-toggled overlay set: coordinate axes
/// plus screen-bound guides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    /// Half-length of each axis line from the origin.
    pub axis_extent: f32,
    pub axis_thickness: f32,
    pub x_axis_color: Color,
    pub y_axis_color: Color,
    pub guides: Vec<GuideRect>,
}

/// Signals fired by the playing tracks during one update step. The runtime's
/// animation listeners surface here so the core can advance timelines and
/// re-dispatch markers on the bus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TrackEvent {
    /// A non-looping animation finished on a track.
    Completed { track: usize, animation: String },
    /// A user-authored animation event (keyed in the asset) fired.
    Marker { track: usize, name: String },
}

/// Factory for rendering applications. One application exists at a time; the
/// lifecycle manager owns it.
pub trait RenderBackend {
    fn create_app(&mut self, options: &AppOptions) -> Result<Box<dyn RenderApp>, RigError>;
}

/// The live rendering application: surface, background plane, overlay set,
/// draw-call instrumentation.
pub trait RenderApp {
    /// Parse the staged assets and instantiate the single rig.
    fn create_rig(&mut self, assets: &RigAssets) -> Result<Box<dyn RigHandle>, RigError>;

    fn surface_size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);

    fn set_background(&mut self, color: Color);
    fn set_background_visible(&mut self, visible: bool);

    fn install_overlays(&mut self, spec: &OverlaySpec);
    fn set_overlays_visible(&mut self, visible: bool);
    /// Recenter the coordinate axes (kept on the rig while dragging).
    fn set_axes_origin(&mut self, x: f32, y: f32);

    /// Render the diagnostic line on the designated display surface.
    fn set_stats_text(&mut self, text: &str);
    /// Draw calls since the last take; reading resets the counter.
    fn take_draw_calls(&mut self) -> u64;

    /// Hide or show the host viewport element.
    fn set_surface_hidden(&mut self, hidden: bool);
    /// Release the application and every GPU-backed resource it owns.
    fn destroy(&mut self);
}

/// The live rig: playback tracks, blend table, skeleton pose, transform, and
/// debug switches. Physically owns the track and blend tables; the viewer
/// core mutates them only through these operations.
pub trait RigHandle {
    fn animations(&self) -> Vec<String>;
    fn skins(&self) -> Vec<String>;

    fn set_animation(&mut self, track: usize, name: &str, looped: bool);
    fn clear_track(&mut self, track: usize);
    fn set_to_setup_pose(&mut self);
    fn set_skin(&mut self, name: &str);

    fn set_mix(&mut self, from_anim: &str, to_anim: &str, duration: f32);
    fn set_default_mix(&mut self, duration: f32);

    fn position(&self) -> (f32, f32);
    fn set_position(&mut self, x: f32, y: f32);
    fn scale(&self) -> (f32, f32);
    fn set_scale(&mut self, x: f32, y: f32);
    fn set_alpha(&mut self, alpha: f32);

    fn set_debug_flag(&mut self, flag: &crate::events::DebugFlag, value: bool);

    /// Advance playback by `dt` seconds, returning the track events fired
    /// during the step in firing order.
    fn update(&mut self, dt: f32) -> Vec<TrackEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_source_format() {
        assert!(SkeletonSource::Binary(vec![1, 2, 3]).is_binary());
        assert!(!SkeletonSource::Json("{}".into()).is_binary());
    }
}
