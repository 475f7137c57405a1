/*!
 * Interactive media node views.
 *
 * Each embedded media node gets a [`MediaView`]: a headless renderer that
 * turns the node's live attributes into a [`ViewLayout`] for the host shell
 * to paint, and owns the pointer-driven resize interaction. All writes go
 * back through the engine's command layer — the view never mutates node
 * attributes directly.
 */

pub mod resize;
pub mod theme;
pub mod view;

pub use resize::{PointerEvent, Rect, ResizeCommit, ResizeInteraction, Throttle};
pub use theme::ViewTheme;
pub use view::{MediaElement, MediaView, ResizeHandle, ViewLayout};
