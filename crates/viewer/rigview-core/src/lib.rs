//! rigview-core: the render/animation control layer of the rigview viewer.
//!
//! This crate coordinates one mutable rendering application and one loaded
//! rig across independently-triggered UI events. UI components and the core
//! are decoupled by a synchronous typed event bus; the lifecycle manager
//! owns the rig, and the playback/viewport/overlay controllers mutate it
//! only through the backend traits defined in rigview-api-core.

pub mod assets;
pub mod bus;
pub mod config;
pub mod overlay;
pub mod playback;
pub mod viewer;
pub mod viewport;

// Re-exports for consumers (hosts, adapters)
pub use assets::stage_rig_assets;
pub use bus::{EventBus, Subscription, SubscriptionSet};
pub use config::ViewerConfig;
pub use overlay::{DrawCallStats, OverlayController};
pub use playback::PlaybackController;
pub use viewer::{Lifecycle, Viewer};
pub use viewport::ViewportController;
pub use rigview_api_core::{
    Color, Event, EventKind, Point, RigError, RigInfo,
};
