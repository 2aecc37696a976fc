//! Viewer configuration.

use rigview_api_core::{Color, GuideRect, OverlaySpec};

/// Tunables for the control layer. Defaults match the viewer's shipped
/// behavior; hosts override what they need and pass the rest through.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Initial rendering surface size; hosts usually pass the window size.
    pub surface_width: u32,
    pub surface_height: u32,
    pub antialias: bool,
    /// Applied when the requested canvas background fails to parse.
    pub fallback_background: Color,
    /// Uniform scale change per wheel event.
    pub zoom_step: f32,
    /// Floor preventing scale from reaching zero or negative.
    pub min_scale: f32,
    /// Rig opacity while a drag gesture is in progress.
    pub drag_alpha: f32,
    /// Bound on concurrent playback tracks; indices past it are rejected.
    pub max_tracks: usize,
    /// Coordinate axes and screen-bound guides, constructed once per rig.
    pub overlay: OverlaySpec,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            surface_width: 1280,
            surface_height: 720,
            antialias: true,
            fallback_background: Color(0x8701b6),
            zoom_step: 0.2,
            min_scale: 0.02,
            drag_alpha: 0.5,
            max_tracks: 6,
            overlay: OverlaySpec {
                axis_extent: 5000.0,
                axis_thickness: 1.0,
                x_axis_color: Color(0xff0000),
                y_axis_color: Color(0x00ff00),
                guides: vec![
                    // base screen and max screen bounds
                    GuideRect {
                        width: 720.0,
                        height: 1280.0,
                        color: Color(0xea9afc),
                        thickness: 0.5,
                    },
                    GuideRect {
                        width: 720.0,
                        height: 1560.0,
                        color: Color(0x98f542),
                        thickness: 0.5,
                    },
                ],
            },
        }
    }
}
