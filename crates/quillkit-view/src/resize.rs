//! Pointer-driven resize interaction.
//!
//! State machine: `Idle → Dragging → Idle`. A drag starts on pointer-down
//! over the resize handle, tracks pointer-moves through a throttle with a
//! trailing-edge guarantee, and ends on pointer-up anywhere in the document
//! (so the drag terminates even when the pointer leaves the element).

use quillkit_engine::MediaKind;
use quillkit_engine::schema::{image, video, youtube};

/// Recompute at most once per window of event time.
pub const THROTTLE_INTERVAL_MS: u64 = 50;

/// Target ratio enforced while resizing video and youtube nodes.
pub const MEDIA_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// Bounding box of the rendered element, in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A pointer event as delivered by the host shell. The timestamp drives the
/// throttle, so simulated sequences behave exactly like live input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: u64,
}

/// A size ready to be committed through the command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeCommit {
    pub width: u32,
    pub height: u32,
}

/// Timer-gated latest-args holder with trailing-edge semantics.
///
/// `submit` either fires immediately (outside the throttle window) or
/// stashes the value, overwriting any previous stash — so intermediate
/// updates may be dropped but a stale value is never applied after a newer
/// one. `flush` releases the stashed value regardless of the window, which
/// is how the final pointer position always lands.
#[derive(Debug)]
pub struct Throttle<T> {
    interval_ms: u64,
    last_fired: Option<u64>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired: None,
            pending: None,
        }
    }

    pub fn submit(&mut self, now_ms: u64, value: T) -> Option<T> {
        match self.last_fired {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => {
                self.pending = Some(value);
                None
            }
            _ => {
                self.last_fired = Some(now_ms);
                self.pending = None;
                Some(value)
            }
        }
    }

    /// Release the stashed trailing value, if any.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.last_fired = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Transient per-drag state; created on pointer-down, destroyed on
/// pointer-up or view teardown. Never shared across nodes.
#[derive(Debug)]
struct ResizeSession {
    origin: Rect,
    /// Enforced width/height ratio: 16/9 for video and youtube, the
    /// element's own ratio at drag start for images.
    aspect: f64,
    last_commit: Option<ResizeCommit>,
}

#[derive(Debug)]
enum DragState {
    Idle,
    Dragging(ResizeSession),
}

/// The `Idle → Dragging → Idle` resize state machine for one node view.
#[derive(Debug)]
pub struct ResizeInteraction {
    state: DragState,
    throttle: Throttle<(f64, f64)>,
    min_width_px: f64,
    fixed_aspect: Option<f64>,
}

impl ResizeInteraction {
    pub fn for_kind(kind: MediaKind) -> Self {
        let (min_width_px, fixed_aspect) = match kind {
            MediaKind::Video => (f64::from(video::VIDEO_MINIMUM_WIDTH_PX), Some(MEDIA_ASPECT_RATIO)),
            MediaKind::Youtube => (
                f64::from(youtube::YOUTUBE_MINIMUM_WIDTH_PX),
                Some(MEDIA_ASPECT_RATIO),
            ),
            MediaKind::Image => (f64::from(image::IMAGE_MINIMUM_WIDTH_PX), None),
        };
        Self {
            state: DragState::Idle,
            throttle: Throttle::new(THROTTLE_INTERVAL_MS),
            min_width_px,
            fixed_aspect,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Pointer-down on the resize handle: capture the element's current
    /// bounding box and enter `Dragging`.
    pub fn pointer_down(&mut self, origin: Rect) {
        let aspect = self.fixed_aspect.unwrap_or_else(|| {
            if origin.height > 0.0 && origin.width > 0.0 {
                origin.width / origin.height
            } else {
                MEDIA_ASPECT_RATIO
            }
        });
        log::debug!("resize drag started (origin {origin:?}, aspect {aspect:.4})");
        self.throttle.clear();
        self.state = DragState::Dragging(ResizeSession {
            origin,
            aspect,
            last_commit: None,
        });
    }

    /// Pointer-move while dragging: compute a clamped candidate size,
    /// throttled. Returns the size to commit, if this event fires.
    pub fn pointer_move(&mut self, event: PointerEvent) -> Option<ResizeCommit> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        match self.throttle.submit(event.timestamp_ms, (event.x, event.y)) {
            Some((x, y)) => {
                let commit = compute(session, x, y, self.min_width_px);
                session.last_commit = Some(commit);
                Some(commit)
            }
            None => {
                log::trace!("resize move deferred by throttle");
                None
            }
        }
    }

    /// Pointer-up anywhere: flush the trailing throttled position (so the
    /// final cursor position is always applied) and return to `Idle`.
    pub fn pointer_up(&mut self) -> Option<ResizeCommit> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let DragState::Dragging(session) = state else {
            return None;
        };
        let trailing = self
            .throttle
            .flush()
            .map(|(x, y)| compute(&session, x, y, self.min_width_px))
            .filter(|commit| session.last_commit != Some(*commit));
        self.throttle.clear();
        log::debug!("resize drag ended");
        trailing
    }

    /// Abandon any in-flight drag, discarding the pending throttled commit.
    /// Idempotent.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            log::debug!("resize drag cancelled");
        }
        self.state = DragState::Idle;
        self.throttle.clear();
    }
}

fn compute(session: &ResizeSession, x: f64, y: f64, min_width_px: f64) -> ResizeCommit {
    let raw_width = x - session.origin.x;
    let raw_height = y - session.origin.y;
    let width = raw_width
        .max(raw_height * session.aspect)
        .max(min_width_px)
        .round();
    let height = (width / session.aspect).round();
    ResizeCommit {
        width: width as u32,
        height: height as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn origin() -> Rect {
        Rect {
            x: 10.0,
            y: 20.0,
            width: 320.0,
            height: 180.0,
        }
    }

    fn event(x: f64, y: f64, t: u64) -> PointerEvent {
        PointerEvent {
            x,
            y,
            timestamp_ms: t,
        }
    }

    #[test]
    fn throttle_fires_leading_edge_then_stashes() {
        let mut throttle = Throttle::new(50);
        assert_eq!(throttle.submit(0, 1), Some(1));
        assert_eq!(throttle.submit(10, 2), None);
        assert_eq!(throttle.submit(20, 3), None);
        // Only the latest stashed value survives.
        assert_eq!(throttle.flush(), Some(3));
        assert_eq!(throttle.flush(), None);
    }

    #[test]
    fn throttle_fires_again_after_the_window() {
        let mut throttle = Throttle::new(50);
        assert_eq!(throttle.submit(0, 1), Some(1));
        assert_eq!(throttle.submit(30, 2), None);
        assert_eq!(throttle.submit(55, 3), Some(3));
        // Firing drops the stale stash.
        assert!(!throttle.has_pending());
    }

    #[test]
    fn first_move_commits_a_16_9_size() {
        let mut interaction = ResizeInteraction::for_kind(MediaKind::Video);
        interaction.pointer_down(origin());
        let commit = interaction.pointer_move(event(650.0, 200.0, 0)).unwrap();
        assert_eq!(commit.width, 640);
        assert_eq!(commit.height, 360);
    }

    #[test]
    fn width_clamps_to_the_variant_minimum() {
        let mut interaction = ResizeInteraction::for_kind(MediaKind::Youtube);
        interaction.pointer_down(origin());
        let commit = interaction.pointer_move(event(15.0, 22.0, 0)).unwrap();
        assert_eq!(commit.width, 200);
        assert_eq!(
            commit.height,
            (200.0 / MEDIA_ASPECT_RATIO).round() as u32
        );
    }

    #[test]
    fn dominant_height_drives_the_width() {
        let mut interaction = ResizeInteraction::for_kind(MediaKind::Video);
        interaction.pointer_down(origin());
        // Mostly-vertical drag: height * 16/9 exceeds the raw width.
        let commit = interaction.pointer_move(event(110.0, 380.0, 0)).unwrap();
        assert_eq!(commit.width, 640);
        assert_eq!(commit.height, 360);
    }

    #[test]
    fn image_drags_keep_the_origin_ratio() {
        let mut interaction = ResizeInteraction::for_kind(MediaKind::Image);
        interaction.pointer_down(Rect {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 400.0,
        });
        let commit = interaction.pointer_move(event(300.0, 100.0, 0)).unwrap();
        assert_eq!(commit.width, 300);
        assert_eq!(commit.height, 300);
    }

    #[test]
    fn pointer_up_flushes_the_trailing_move() {
        let mut interaction = ResizeInteraction::for_kind(MediaKind::Video);
        interaction.pointer_down(origin());
        assert!(interaction.pointer_move(event(400.0, 100.0, 0)).is_some());
        // Inside the throttle window: deferred.
        assert!(interaction.pointer_move(event(650.0, 200.0, 20)).is_none());
        let trailing = interaction.pointer_up().unwrap();
        assert_eq!(trailing.width, 640);
        assert!(!interaction.is_dragging());
    }

    #[test]
    fn pointer_up_without_pending_commit_is_silent() {
        let mut interaction = ResizeInteraction::for_kind(MediaKind::Video);
        interaction.pointer_down(origin());
        assert!(interaction.pointer_move(event(650.0, 200.0, 0)).is_some());
        assert_eq!(interaction.pointer_up(), None);
    }

    #[test]
    fn moves_while_idle_are_ignored() {
        let mut interaction = ResizeInteraction::for_kind(MediaKind::Video);
        assert_eq!(interaction.pointer_move(event(650.0, 200.0, 0)), None);
        assert_eq!(interaction.pointer_up(), None);
    }

    #[test]
    fn cancel_discards_the_pending_commit() {
        let mut interaction = ResizeInteraction::for_kind(MediaKind::Video);
        interaction.pointer_down(origin());
        assert!(interaction.pointer_move(event(400.0, 100.0, 0)).is_some());
        assert!(interaction.pointer_move(event(650.0, 200.0, 20)).is_none());
        interaction.cancel();
        assert_eq!(interaction.pointer_up(), None);
        // Cancelling twice is fine.
        interaction.cancel();
    }
}
