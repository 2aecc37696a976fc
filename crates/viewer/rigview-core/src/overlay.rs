//! Debug/overlay controller: overlay-set visibility, debug flags, and
//! per-frame draw-call statistics.

use rigview_api_core::{DebugToggle, OverlaySpec, RenderApp, RigHandle};

/// Per-frame draw-call count plus the running maximum. Diagnostic only;
/// never feeds back into rendering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrawCallStats {
    pub current: u64,
    pub max: u64,
}

impl DrawCallStats {
    pub fn record(&mut self, calls: u64) {
        self.current = calls;
        self.max = self.max.max(calls);
    }

    pub fn text(&self) -> String {
        format!("Draw Call: {} - Max: {}", self.current, self.max)
    }
}

#[derive(Debug, Default)]
pub struct OverlayController {
    visible: bool,
    stats: DrawCallStats,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn stats(&self) -> DrawCallStats {
        self.stats
    }

    /// Construct the overlay set on a fresh application; it starts hidden
    /// until the user asks for screen bounds.
    pub fn install(&mut self, app: &mut dyn RenderApp, spec: &OverlaySpec) {
        app.install_overlays(spec);
        self.set_screen_visible(app, false);
    }

    /// Toggle visibility uniformly across the overlay set and the
    /// background plane; animation state is untouched.
    pub fn set_screen_visible(&mut self, app: &mut dyn RenderApp, visible: bool) {
        self.visible = visible;
        app.set_overlays_visible(visible);
        app.set_background_visible(visible);
    }

    /// Flip one named debug flag on the live rig. Unknown names ride the
    /// [`rigview_api_core::DebugFlag::Other`] passthrough to the runtime.
    pub fn set_debug_option(&self, rig: &mut dyn RigHandle, toggle: &DebugToggle) {
        rig.set_debug_flag(&toggle.option, toggle.value);
    }

    /// Per-frame reporting: pull the draw-call counter (resetting it),
    /// update the running maximum, render the diagnostic line.
    pub fn on_frame(&mut self, app: &mut dyn RenderApp) {
        let calls = app.take_draw_calls();
        self.stats.record(calls);
        app.set_stats_text(&self.stats.text());
    }
}
