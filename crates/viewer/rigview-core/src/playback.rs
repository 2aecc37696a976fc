//! Playback controller: per-track animation state, timeline sequencing, and
//! blend-table commands.
//!
//! The track and blend tables physically live inside the rig's playback
//! state; this controller is the only writer. It holds what the rig cannot:
//! the pending timeline queue and whether track events should be forwarded
//! onto the bus. Every operation takes the rig handle as an argument; the
//! lifecycle manager decides whether a rig exists at all.

use std::collections::VecDeque;

use rigview_api_core::{BlendEntry, Event, PlayRequest, RigHandle, TrackEvent};

/// Listener state for track 0: detached after a bare pose reset, forwarding
/// markers after a plain start, and additionally advancing the queue while a
/// timeline is pending.
#[derive(Debug, Default, Clone, PartialEq)]
enum TrackListener {
    #[default]
    Detached,
    Forward,
    Timeline(VecDeque<String>),
}

#[derive(Debug, Default)]
pub struct PlaybackController {
    listener: TrackListener,
    max_tracks: usize,
}

impl PlaybackController {
    pub fn new(max_tracks: usize) -> Self {
        Self {
            listener: TrackListener::Detached,
            max_tracks,
        }
    }

    /// Drop the timeline queue and forwarding state, as on pose reset or rig
    /// destruction.
    pub fn reset(&mut self) {
        self.listener = TrackListener::Detached;
    }

    /// Entries still pending on the timeline queue.
    pub fn pending_timeline(&self) -> usize {
        match &self.listener {
            TrackListener::Timeline(queue) => queue.len(),
            _ => 0,
        }
    }

    /// Clear the track, reset the pose, then start the requested animation.
    /// An empty animation name stops the track; a track index past the bound
    /// is rejected without touching the rig.
    pub fn start_animation(&mut self, rig: &mut dyn RigHandle, request: &PlayRequest) {
        let track = request.track.unwrap_or(0);
        if track >= self.max_tracks {
            log::warn!(
                "rejecting start-animation on track {track}; only {} tracks are available",
                self.max_tracks
            );
            return;
        }

        rig.clear_track(track);
        self.listener = TrackListener::Detached;
        rig.set_to_setup_pose();

        if !request.animation.is_empty() {
            rig.set_animation(track, &request.animation, request.looped);
            self.listener = TrackListener::Forward;
        }
    }

    pub fn set_skin(&self, rig: &mut dyn RigHandle, name: &str) {
        rig.set_skin(name);
    }

    /// Insert or overwrite one explicit blend-table entry. Explicit entries
    /// take precedence over the default duration inside the rig.
    pub fn set_blend(&self, rig: &mut dyn RigHandle, entry: &BlendEntry) {
        rig.set_mix(
            &entry.from_anim,
            &entry.to_anim,
            non_negative(entry.duration, "blend duration"),
        );
    }

    /// Overwrite the fallback duration for pairs without an explicit entry,
    /// including pairs not yet seen.
    pub fn set_default_blend(&self, rig: &mut dyn RigHandle, duration: f32) {
        rig.set_default_mix(non_negative(duration, "default blend duration"));
    }

    /// Play an ordered sequence back-to-back on track 0, non-looping. Each
    /// entry starts only once the previous one completes. An empty sequence
    /// is a no-op.
    pub fn play_timeline(&mut self, rig: &mut dyn RigHandle, animations: &[String]) {
        let mut queue: VecDeque<String> = animations.iter().cloned().collect();
        let Some(first) = queue.pop_front() else {
            return;
        };

        rig.clear_track(0);
        self.listener = TrackListener::Detached;
        rig.set_to_setup_pose();
        rig.set_animation(0, &first, false);
        self.listener = TrackListener::Timeline(queue);
    }

    /// Clear track 0 and restore the rest pose. Cancels a pending timeline;
    /// other tracks keep their entries.
    pub fn setup_pose(&mut self, rig: &mut dyn RigHandle) {
        rig.clear_track(0);
        self.listener = TrackListener::Detached;
        rig.set_to_setup_pose();
    }

    /// Route one rig-fired track event. Markers become bus re-dispatches
    /// while a listener is attached; a completion on track 0 advances the
    /// timeline queue, and the listener degrades to plain forwarding once
    /// the queue empties.
    pub fn on_track_event(
        &mut self,
        rig: &mut dyn RigHandle,
        event: &TrackEvent,
    ) -> Option<Event> {
        if self.listener == TrackListener::Detached {
            return None;
        }

        match event {
            TrackEvent::Marker { name, .. } => Some(Event::RigEvent { name: name.clone() }),
            TrackEvent::Completed { track, .. } => {
                if *track == 0 {
                    let mut exhausted = false;
                    if let TrackListener::Timeline(queue) = &mut self.listener {
                        match queue.pop_front() {
                            Some(next) => rig.set_animation(0, &next, false),
                            None => exhausted = true,
                        }
                    }
                    if exhausted {
                        self.listener = TrackListener::Forward;
                    }
                }
                None
            }
        }
    }
}

fn non_negative(duration: f32, what: &str) -> f32 {
    if duration < 0.0 {
        log::warn!("clamping negative {what} {duration} to 0");
        0.0
    } else {
        duration
    }
}
