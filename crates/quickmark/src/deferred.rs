// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Deferred selection re-application.
//!
//! Native text inputs tend to ignore a selection that is set in the same
//! update that replaced their value, so after a programmatic edit the host
//! has to set the selection again on a later turn of its event loop (and
//! restore focus at the same time).
//!
//! A [`SelectionSlot`] holds at most one such pending selection. Scheduling
//! a new one replaces the old one, and every outstanding [`SelectionTask`]
//! for the replaced selection becomes stale. A task also goes stale when the
//! slot's owner is dropped, so a host that unmounts its editor before the
//! deferred step runs never touches a control that no longer exists.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::Selection;

#[derive(Debug, Default)]
struct SlotState {
    generation: u64,
    pending: Option<Selection>,
}

/// Holds the single pending selection update of an editor.
#[derive(Debug, Default)]
pub struct SelectionSlot {
    state: Rc<RefCell<SlotState>>,
}

impl SelectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending update with `selection`.
    pub fn schedule(&self, selection: Selection) -> SelectionTask {
        let mut state = self.state.borrow_mut();
        state.generation = state.generation.wrapping_add(1);
        if let Some(stale) = state.pending.replace(selection) {
            log::debug!("superseding pending selection update {stale:?}");
        }
        SelectionTask {
            state: Rc::downgrade(&self.state),
            generation: state.generation,
        }
    }

    /// Drop the pending update, if any.
    pub fn cancel(&self) {
        if let Some(stale) = self.state.borrow_mut().pending.take() {
            log::debug!("cancelling pending selection update {stale:?}");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }
}

/// A one-shot handle on a scheduled selection update.
///
/// The host keeps this until its deferred callback runs, then calls
/// [`SelectionTask::take`].
#[derive(Debug)]
#[must_use = "a selection task does nothing unless it is taken"]
pub struct SelectionTask {
    state: Weak<RefCell<SlotState>>,
    generation: u64,
}

impl SelectionTask {
    /// Whether [`take`](Self::take) would currently yield a selection.
    pub fn is_current(&self) -> bool {
        self.state.upgrade().is_some_and(|state| {
            let state = state.borrow();
            state.generation == self.generation && state.pending.is_some()
        })
    }

    /// Claim the selection to apply, emptying the slot.
    ///
    /// Returns `None` if the update was superseded, cancelled or already
    /// taken, or if the slot's owner has been dropped.
    pub fn take(self) -> Option<Selection> {
        let Some(state) = self.state.upgrade() else {
            log::debug!("dropping selection update: editor is gone");
            return None;
        };
        let mut state = state.borrow_mut();
        if state.generation != self.generation {
            log::debug!("dropping stale selection update");
            return None;
        }
        state.pending.take()
    }
}
