//! Modal overlays.
//!
//! Overlays temporarily take over keyboard input. Each overlay owns its state,
//! key handler and render function.
//!
//! - `notice.rs`: blocking notification (submission outcomes)
//! - `progress.rs`: blocking indicator while a submission is in flight
//! - `render_utils.rs`: shared rendering helpers

mod notice;
mod progress;
pub mod render_utils;

use crossterm::event::KeyEvent;
pub use notice::{NoticeState, NoticeTone};
pub use progress::render_progress;
use ratatui::Frame;
use ratatui::layout::Rect;

/// Transition returned by overlay key handlers.
#[derive(Debug, PartialEq, Eq)]
pub enum OverlayTransition {
    Stay,
    Close,
}

#[derive(Debug)]
pub enum Overlay {
    Notice(NoticeState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::Notice(n) => n.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayTransition {
        match self {
            Overlay::Notice(n) => n.handle_key(key),
        }
    }
}

/// Routes a key to the active overlay. Returns false when no overlay is open.
pub fn handle_overlay_key(overlay: &mut Option<Overlay>, key: KeyEvent) -> bool {
    let Some(active) = overlay.as_mut() else {
        return false;
    };
    if active.handle_key(key) == OverlayTransition::Close {
        *overlay = None;
    }
    true
}
