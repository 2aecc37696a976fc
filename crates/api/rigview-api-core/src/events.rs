//! Bus event contracts.
//!
//! [`Event`] is the closed set of envelopes exchanged on the viewer bus: one
//! variant per event kind, each statically carrying its payload shape, so the
//! dispatch/subscribe surface is exhaustively checkable. [`EventKind`] is the
//! fieldless discriminant used to key subscriptions.

use serde::{Deserialize, Serialize};

use crate::files::FilesLoadedData;

/// Envelope for every message on the viewer bus.
///
/// Serialized form is `{ "id": "<kind>", "payload": ... }`, matching the
/// wire shape UI transports expect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "id", content = "payload", rename_all = "kebab-case")]
pub enum Event {
    /// Start (or, with an empty animation name, stop) playback on a track.
    StartAnimation(PlayRequest),
    /// Switch the rig's active skin by name.
    SetSkin { name: String },
    /// Insert or overwrite one explicit blend-table entry.
    SetBlend(BlendEntry),
    /// Overwrite the default blend duration used by pairs without an entry.
    SetDefaultBlend { duration: f32 },
    /// Tint the background plane.
    SetBackground { hex: String },
    /// Toggle the overlay set and background plane visibility.
    SetScreenVisible { visible: bool },
    /// Play an ordered sequence of animations back-to-back on track 0.
    PlayTimeline { animations: Vec<String> },
    /// Flip one named debug flag on the live rig.
    SetDebugOption(DebugToggle),
    /// Clear track 0 and restore the rest pose.
    SetupPose,
    /// Tear down the application and rig.
    DestroyApp,
    /// A decoded file set is ready; triggers rig construction.
    FilesLoaded(FilesLoadedData),
    /// Emitted once per successful init with the rig's catalogue.
    RigCreated(RigInfo),
    /// Re-dispatch of an animation-defined event fired by a playing track.
    RigEvent { name: String },
}

impl Event {
    /// Discriminant of this envelope, used to key bus subscriptions.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StartAnimation(_) => EventKind::StartAnimation,
            Event::SetSkin { .. } => EventKind::SetSkin,
            Event::SetBlend(_) => EventKind::SetBlend,
            Event::SetDefaultBlend { .. } => EventKind::SetDefaultBlend,
            Event::SetBackground { .. } => EventKind::SetBackground,
            Event::SetScreenVisible { .. } => EventKind::SetScreenVisible,
            Event::PlayTimeline { .. } => EventKind::PlayTimeline,
            Event::SetDebugOption(_) => EventKind::SetDebugOption,
            Event::SetupPose => EventKind::SetupPose,
            Event::DestroyApp => EventKind::DestroyApp,
            Event::FilesLoaded(_) => EventKind::FilesLoaded,
            Event::RigCreated(_) => EventKind::RigCreated,
            Event::RigEvent { .. } => EventKind::RigEvent,
        }
    }
}

/// Identifier of one event kind. Globally unique within the closed set.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    StartAnimation,
    SetSkin,
    SetBlend,
    SetDefaultBlend,
    SetBackground,
    SetScreenVisible,
    PlayTimeline,
    SetDebugOption,
    SetupPose,
    DestroyApp,
    FilesLoaded,
    RigCreated,
    RigEvent,
}

impl EventKind {
    /// Every kind, in declaration order. Handy for wiring and tests.
    pub const ALL: [EventKind; 13] = [
        EventKind::StartAnimation,
        EventKind::SetSkin,
        EventKind::SetBlend,
        EventKind::SetDefaultBlend,
        EventKind::SetBackground,
        EventKind::SetScreenVisible,
        EventKind::PlayTimeline,
        EventKind::SetDebugOption,
        EventKind::SetupPose,
        EventKind::DestroyApp,
        EventKind::FilesLoaded,
        EventKind::RigCreated,
        EventKind::RigEvent,
    ];
}

/// Payload of start-animation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayRequest {
    /// Animation name; empty means stop the track.
    pub animation: String,
    #[serde(rename = "loop")]
    pub looped: bool,
    /// Track index; defaults to 0 when the UI omits it.
    #[serde(default)]
    pub track: Option<usize>,
}

/// One explicit blend-table entry: the crossfade duration applied when a
/// track switches from one animation to another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendEntry {
    pub from_anim: String,
    pub to_anim: String,
    /// Seconds; negative input is clamped to zero by the playback controller.
    pub duration: f32,
}

/// Payload of set-debug-option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugToggle {
    pub option: DebugFlag,
    pub value: bool,
}

/// Debug flags the rendering runtime understands.
///
/// The closed variants map to the runtime's known draw-debug switches;
/// [`DebugFlag::Other`] is the documented escape hatch for flags passed
/// through opaquely rather than validated here.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DebugFlag {
    Bones,
    RegionAttachments,
    MeshHull,
    MeshTriangles,
    ClippingPolygons,
    Paths,
    BoundingBoxes,
    Other(String),
}

impl DebugFlag {
    /// Property name as the rendering runtime spells it.
    pub fn property_name(&self) -> &str {
        match self {
            DebugFlag::Bones => "drawBones",
            DebugFlag::RegionAttachments => "drawRegionAttachments",
            DebugFlag::MeshHull => "drawMeshHull",
            DebugFlag::MeshTriangles => "drawMeshTriangles",
            DebugFlag::ClippingPolygons => "drawClippingPolygons",
            DebugFlag::Paths => "drawPaths",
            DebugFlag::BoundingBoxes => "drawBoundingBoxes",
            DebugFlag::Other(name) => name,
        }
    }
}

impl From<String> for DebugFlag {
    fn from(name: String) -> Self {
        match name.as_str() {
            "drawBones" => DebugFlag::Bones,
            "drawRegionAttachments" => DebugFlag::RegionAttachments,
            "drawMeshHull" => DebugFlag::MeshHull,
            "drawMeshTriangles" => DebugFlag::MeshTriangles,
            "drawClippingPolygons" => DebugFlag::ClippingPolygons,
            "drawPaths" => DebugFlag::Paths,
            "drawBoundingBoxes" => DebugFlag::BoundingBoxes,
            _ => DebugFlag::Other(name),
        }
    }
}

impl From<DebugFlag> for String {
    fn from(flag: DebugFlag) -> Self {
        flag.property_name().to_string()
    }
}

/// Payload of rig-created: the catalogue UI pickers are populated from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigInfo {
    pub animations: Vec<String>,
    pub skins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Event::SetupPose.kind(), EventKind::SetupPose);
        assert_eq!(
            Event::RigEvent {
                name: "footstep".into()
            }
            .kind(),
            EventKind::RigEvent
        );
        assert_eq!(
            Event::SetDefaultBlend { duration: 0.4 }.kind(),
            EventKind::SetDefaultBlend
        );
    }

    #[test]
    fn envelope_wire_shape() {
        let event = Event::StartAnimation(PlayRequest {
            animation: "walk".into(),
            looped: true,
            track: Some(2),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], "start-animation");
        assert_eq!(json["payload"]["animation"], "walk");
        assert_eq!(json["payload"]["loop"], true);
        assert_eq!(json["payload"]["track"], 2);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn unit_envelope_wire_shape() {
        let json = serde_json::to_value(Event::DestroyApp).unwrap();
        assert_eq!(json["id"], "destroy-app");
    }

    #[test]
    fn debug_flag_round_trip() {
        assert_eq!(DebugFlag::from("drawBones".to_string()), DebugFlag::Bones);
        assert_eq!(DebugFlag::Bones.property_name(), "drawBones");

        let passthrough = DebugFlag::from("drawSomethingNew".to_string());
        assert_eq!(
            passthrough,
            DebugFlag::Other("drawSomethingNew".to_string())
        );
        assert_eq!(passthrough.property_name(), "drawSomethingNew");
    }

    #[test]
    fn all_kinds_are_distinct() {
        for (i, a) in EventKind::ALL.iter().enumerate() {
            for b in &EventKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
