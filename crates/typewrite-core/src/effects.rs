use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Cloneable cleanup handle whose action runs at most once across all clones.
///
/// Subscriptions hand one of these back as their unsubscribe function.
#[derive(Clone)]
pub struct Dispose(Rc<Cell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(Cell::new(Some(Box::new(f)))))
    }

    /// A handle with nothing to do.
    pub fn noop() -> Self {
        Self(Rc::new(Cell::new(None)))
    }

    /// Runs the action if no clone has run it yet.
    pub fn run(&self) {
        if let Some(f) = self.0.take() {
            f()
        }
    }

    pub fn is_spent(&self) -> bool {
        // Cell<Option<Box<_>>> can't be peeked; swap out and back.
        let f = self.0.take();
        let spent = f.is_none();
        self.0.set(f);
        spent
    }
}

impl fmt::Debug for Dispose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispose")
            .field("spent", &self.is_spent())
            .finish()
    }
}
