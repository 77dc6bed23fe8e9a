use dreamhall_input::{PointerError, PointerSurface};
use std::sync::Arc;
use winit::window::{CursorGrabMode, Window};

/// Pointer capture on the app window.
pub struct WindowPointer {
    window: Arc<Window>,
    locked: bool,
}

impl WindowPointer {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            locked: false,
        }
    }
}

impl PointerSurface for WindowPointer {
    fn is_locked(&self) -> bool {
        self.locked
    }

    fn request_lock(&mut self) -> Result<(), PointerError> {
        // Locked is unsupported on some platforms; Confined is the fallback.
        self.window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
            .map_err(|e| PointerError::Rejected(e.to_string()))?;
        self.window.set_cursor_visible(false);
        self.locked = true;
        Ok(())
    }

    fn exit_lock(&mut self) -> Result<(), PointerError> {
        self.window
            .set_cursor_grab(CursorGrabMode::None)
            .map_err(|e| PointerError::Rejected(e.to_string()))?;
        self.window.set_cursor_visible(true);
        self.locked = false;
        Ok(())
    }
}
