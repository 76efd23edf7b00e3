use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::Intent;

/// FIFO of intents waiting for the engine.
///
/// Everything runs on one thread: views push while rendering, and the engine
/// pops only between complete coordination cycles, so handlers never nest.
#[derive(Debug, Default)]
pub struct IntentInbox {
    queue: Rc<RefCell<VecDeque<Intent>>>,
}

/// Cloneable handle views use to submit intents.
#[derive(Debug, Clone)]
pub struct IntentSender {
    queue: Rc<RefCell<VecDeque<Intent>>>,
}

impl IntentSender {
    pub fn send(&self, intent: Intent) {
        self.queue.borrow_mut().push_back(intent);
    }
}

impl IntentInbox {
    #[must_use]
    pub fn sender(&self) -> IntentSender {
        IntentSender {
            queue: Rc::clone(&self.queue),
        }
    }

    pub fn pop(&self) -> Option<Intent> {
        self.queue.borrow_mut().pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
