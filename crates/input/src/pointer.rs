/// Errors from pointer capture requests.
#[derive(Debug, thiserror::Error)]
pub enum PointerError {
    #[error("no render surface to capture the pointer on")]
    Unavailable,
    #[error("pointer capture rejected: {0}")]
    Rejected(String),
}

/// A render surface that can take exclusive mouse capture.
///
/// The surface is the source of truth for whether capture is engaged; the
/// controller asks it rather than tracking its own flag.
pub trait PointerSurface {
    fn is_locked(&self) -> bool;
    fn request_lock(&mut self) -> Result<(), PointerError>;
    fn exit_lock(&mut self) -> Result<(), PointerError>;
}

/// Engage capture if it is not engaged, release it otherwise.
/// Returns the new capture state.
pub fn toggle_pointer_lock<S>(surface: &mut S) -> Result<bool, PointerError>
where
    S: PointerSurface + ?Sized,
{
    if surface.is_locked() {
        surface.exit_lock()?;
    } else {
        surface.request_lock()?;
    }
    let locked = surface.is_locked();
    tracing::debug!(locked, "pointer lock toggled");
    Ok(locked)
}

/// In-memory surface for headless runs and tests.
#[derive(Debug, Clone)]
pub struct HeadlessPointer {
    locked: bool,
    available: bool,
}

impl Default for HeadlessPointer {
    fn default() -> Self {
        Self {
            locked: false,
            available: true,
        }
    }
}

impl HeadlessPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locked() -> Self {
        Self {
            locked: true,
            available: true,
        }
    }

    /// A surface that refuses every capture request.
    pub fn unavailable() -> Self {
        Self {
            locked: false,
            available: false,
        }
    }
}

impl PointerSurface for HeadlessPointer {
    fn is_locked(&self) -> bool {
        self.locked
    }

    fn request_lock(&mut self) -> Result<(), PointerError> {
        if !self.available {
            return Err(PointerError::Unavailable);
        }
        self.locked = true;
        Ok(())
    }

    fn exit_lock(&mut self) -> Result<(), PointerError> {
        self.locked = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_state() {
        let mut p = HeadlessPointer::new();
        assert!(toggle_pointer_lock(&mut p).unwrap());
        assert!(!toggle_pointer_lock(&mut p).unwrap());
        assert!(!p.is_locked());

        let mut p = HeadlessPointer::locked();
        toggle_pointer_lock(&mut p).unwrap();
        toggle_pointer_lock(&mut p).unwrap();
        assert!(p.is_locked());
    }

    #[test]
    fn unavailable_surface_stays_unlocked() {
        let mut p = HeadlessPointer::unavailable();
        assert!(matches!(
            toggle_pointer_lock(&mut p),
            Err(PointerError::Unavailable)
        ));
        assert!(!p.is_locked());
    }

    #[test]
    fn works_through_trait_objects() {
        let mut p = HeadlessPointer::new();
        let surface: &mut dyn PointerSurface = &mut p;
        assert!(toggle_pointer_lock(surface).unwrap());
    }
}
