//! Per-hook subscriber lists with two-phase removal.
//!
//! Unsubscribing only marks an entry. The sweep happens at the top of the next
//! pass for that hook, so a pass already collected is never altered while the
//! next one reliably skips the entry.
//!
//! Unsubscribe handles don't touch the registry directly: they push their key
//! onto a shared list that every pass drains first, so they work even while
//! the session is borrowed.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::stage::Hook;

new_key_type! {
    pub struct SubscriptionKey;
}

/// Subscriber callback. Stage hooks receive the current string index; the
/// array/instance hooks receive `0`.
pub type Listener = Rc<dyn Fn(usize)>;

struct Entry {
    callback: Listener,
    once: bool,
    pending_removal: bool,
}

#[derive(Default)]
pub(crate) struct Registry {
    entries: SlotMap<SubscriptionKey, Entry>,
    order: [SmallVec<[SubscriptionKey; 4]>; Hook::COUNT],
    unsubscribed: Rc<RefCell<Vec<SubscriptionKey>>>,
}

impl Registry {
    pub fn add(&mut self, hook: Hook, callback: Listener, once: bool) -> SubscriptionKey {
        let key = self.entries.insert(Entry {
            callback,
            once,
            pending_removal: false,
        });
        self.order[hook.slot()].push(key);
        key
    }

    pub fn mark_removed(&mut self, key: SubscriptionKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.pending_removal = true;
        }
    }

    /// Closure that removes `key` from the next pass on. Outliving the
    /// registry is harmless.
    pub fn unsubscriber(&self, key: SubscriptionKey) -> impl FnOnce() + 'static {
        let unsubscribed = Rc::downgrade(&self.unsubscribed);
        move || {
            if let Some(list) = unsubscribed.upgrade() {
                list.borrow_mut().push(key);
            }
        }
    }

    /// Start a pass: sweep marked entries, then collect the live callbacks in
    /// registration order. `once` entries are marked as they are collected.
    pub fn begin_pass(&mut self, hook: Hook) -> Vec<Listener> {
        let requested = std::mem::take(&mut *self.unsubscribed.borrow_mut());
        for key in requested {
            self.mark_removed(key);
        }

        let entries = &mut self.entries;
        let order = &mut self.order[hook.slot()];
        order.retain(|key| match entries.get(*key) {
            Some(entry) if entry.pending_removal => {
                entries.remove(*key);
                false
            }
            Some(_) => true,
            None => false,
        });

        let mut pass = Vec::with_capacity(order.len());
        for key in order.iter() {
            if let Some(entry) = entries.get_mut(*key) {
                if entry.once {
                    entry.pending_removal = true;
                }
                pass.push(entry.callback.clone());
            }
        }
        pass
    }

    #[cfg(test)]
    pub fn live(&self, hook: Hook) -> usize {
        self.order[hook.slot()]
            .iter()
            .filter(|key| self.entries.get(**key).is_some_and(|e| !e.pending_removal))
            .count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.unsubscribed.borrow_mut().clear();
        for order in &mut self.order {
            order.clear();
        }
    }
}
