//! Drop-order fixtures.
//!
//! A [`DropProbe`] appends its id to a shared [`DropLog`] when dropped,
//! so tests can check that a container destroys each element exactly
//! once and in the expected order.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared record of dropped probe ids, in drop order.
#[derive(Clone, Default)]
pub struct DropLog {
    dropped: Rc<RefCell<Vec<u32>>>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe with `id` that reports to this log.
    pub fn probe(&self, id: u32) -> DropProbe {
        DropProbe {
            id,
            log: self.clone(),
        }
    }

    /// Ids dropped so far, in drop order.
    pub fn dropped(&self) -> Vec<u32> {
        self.dropped.borrow().clone()
    }

    /// Number of drops recorded.
    pub fn count(&self) -> usize {
        self.dropped.borrow().len()
    }

    /// Forget everything recorded so far.
    pub fn reset(&self) {
        self.dropped.borrow_mut().clear();
    }
}

/// Element that logs its id on drop.
pub struct DropProbe {
    id: u32,
    log: DropLog,
}

impl DropProbe {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.log.dropped.borrow_mut().push(self.id);
    }
}

impl fmt::Debug for DropProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DropProbe({})", self.id)
    }
}

impl PartialEq for DropProbe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
