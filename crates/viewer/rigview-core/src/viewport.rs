//! Viewport/interaction controller: pointer-drag, wheel-zoom, resize.
//!
//! Drag is a two-state machine (idle or dragging) keyed off pointer events
//! the host wires in. Anchors are captured on pointer-down and cleared on
//! any pointer-up, including one landing outside the surface, so a gesture
//! can never stick.

use rigview_api_core::{Point, RenderApp, RigHandle};

use crate::config::ViewerConfig;

#[derive(Debug, Clone, Copy)]
struct DragState {
    pointer_anchor: Point,
    rig_anchor: Point,
}

#[derive(Debug)]
pub struct ViewportController {
    drag: Option<DragState>,
    zoom_step: f32,
    min_scale: f32,
    drag_alpha: f32,
}

impl ViewportController {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            drag: None,
            zoom_step: config.zoom_step,
            min_scale: config.min_scale,
            drag_alpha: config.drag_alpha,
        }
    }

    /// Clear ephemeral gesture state, as on rig destruction.
    pub fn reset(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Idle → Dragging: capture the pointer position and the rig placement
    /// as anchors; dim the rig as a drag affordance.
    pub fn pointer_down(&mut self, rig: &mut dyn RigHandle, at: Point) {
        let (x, y) = rig.position();
        self.drag = Some(DragState {
            pointer_anchor: at,
            rig_anchor: Point::new(x, y),
        });
        rig.set_alpha(self.drag_alpha);
    }

    /// While dragging: place the rig at anchor-plus-delta and keep the
    /// coordinate axes centered on it.
    pub fn pointer_move(&mut self, rig: &mut dyn RigHandle, app: &mut dyn RenderApp, at: Point) {
        let Some(drag) = self.drag else { return };
        let x = drag.rig_anchor.x + (at.x - drag.pointer_anchor.x);
        let y = drag.rig_anchor.y + (at.y - drag.pointer_anchor.y);
        rig.set_position(x, y);
        app.set_axes_origin(x, y);
    }

    /// Dragging → Idle: restore opacity and clear both anchors. Pointer-up
    /// outside the surface takes this exact path too.
    pub fn pointer_up(&mut self, rig: &mut dyn RigHandle) {
        if self.drag.take().is_some() {
            rig.set_alpha(1.0);
        }
    }

    /// Step uniform scale by the configured amount per wheel event, floored
    /// so scale never reaches zero. Ignored while a drag is in progress (a
    /// zoom mid-gesture would invalidate the drag anchors).
    pub fn wheel(&mut self, rig: &mut dyn RigHandle, delta_y: f32) {
        if self.drag.is_some() {
            return;
        }
        let (scale_x, _) = rig.scale();
        let stepped = if delta_y <= 0.0 {
            scale_x + self.zoom_step
        } else {
            scale_x - self.zoom_step
        };
        let clamped = stepped.max(self.min_scale);
        rig.set_scale(clamped, clamped);
    }

    /// Resize the rendering surface; the rig's logical transform is left
    /// untouched.
    pub fn resize(&self, app: &mut dyn RenderApp, width: u32, height: u32) {
        app.resize(width, height);
    }
}
