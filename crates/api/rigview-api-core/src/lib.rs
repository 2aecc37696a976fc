//! rigview-api-core: shared contracts for the rigview viewer (engine-agnostic)
//!
//! This crate defines the closed bus-event enumeration and its payload types,
//! the loaded-file model handed over by the file-loading collaborator, color
//! parsing, the rendering-backend trait boundary, and the error taxonomy.
//! Both the viewer core and host adapters depend on these types; nothing here
//! touches a concrete rendering engine.

pub mod backend;
pub mod color;
pub mod error;
pub mod events;
pub mod files;

// Re-exports for consumers (viewer core, adapters, fixtures)
pub use backend::{
    AppOptions, GuideRect, OverlaySpec, Point, RenderApp, RenderBackend, RigAssets, RigHandle,
    SkeletonSource, TexturePage, TrackEvent,
};
pub use color::Color;
pub use error::RigError;
pub use events::{
    BlendEntry, DebugFlag, DebugToggle, Event, EventKind, PlayRequest, RigInfo,
};
pub use files::{FileData, FileEntry, FileKind, FilesLoadedData};
