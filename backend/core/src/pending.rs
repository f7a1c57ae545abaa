use std::sync::{Mutex, MutexGuard};

use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::PickError;
use crate::message::PickerOutcome;
use crate::types::PickPhase;

enum Slot {
    Idle,
    Armed {
        id: Uuid,
        phase: PickPhase,
        /// Taken once the picker answers; the cycle stays armed until the
        /// ticket is dropped.
        tx: Option<oneshot::Sender<PickerOutcome>>,
    },
}

/// The single outstanding pick continuation.
///
/// Armed at the start of a pick cycle, answered at most once by the native
/// picker callbacks, and cleared when the [`PickTicket`] goes out of scope,
/// whichever way the cycle ends.
pub struct PendingPick {
    slot: Mutex<Slot>,
}

impl PendingPick {
    pub fn new() -> Self {
        Self { slot: Mutex::new(Slot::Idle) }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim the slot for a new cycle. Fails if another cycle is still running.
    pub fn arm(&self) -> Result<(PickTicket<'_>, oneshot::Receiver<PickerOutcome>), PickError> {
        let mut slot = self.lock();
        if let Slot::Armed { id, phase, .. } = &*slot {
            warn!(pick_id = %id, ?phase, "Rejecting pick: another pick is pending");
            return Err(PickError::InProgress);
        }
        let id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();
        *slot = Slot::Armed { id, phase: PickPhase::Launching, tx: Some(tx) };
        debug!(pick_id = %id, "Pick slot armed");
        Ok((PickTicket { owner: self, id }, rx))
    }

    /// Deliver the picker's answer. Returns `false` if nothing was waiting.
    pub fn resolve(&self, outcome: PickerOutcome) -> bool {
        let tx = match &mut *self.lock() {
            Slot::Armed { tx, .. } => tx.take(),
            Slot::Idle => None,
        };
        match tx {
            Some(tx) => tx.send(outcome).is_ok(),
            None => {
                debug!("Picker answered with no pick waiting; ignoring");
                false
            }
        }
    }

    /// Drop the waiting continuation without answering it, e.g. when the
    /// plugin is detached for good. The waiting cycle observes a closed channel.
    pub fn abandon(&self) -> bool {
        match &mut *self.lock() {
            Slot::Armed { tx, .. } => tx.take().is_some(),
            Slot::Idle => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(&*self.lock(), Slot::Armed { .. })
    }

    pub fn phase(&self) -> PickPhase {
        match &*self.lock() {
            Slot::Armed { phase, .. } => *phase,
            Slot::Idle => PickPhase::Idle,
        }
    }
}

impl Default for PendingPick {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of ownership of the armed slot. Clears the slot on drop.
pub struct PickTicket<'a> {
    owner: &'a PendingPick,
    id: Uuid,
}

impl PickTicket<'_> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn advance(&self, next: PickPhase) {
        if let Slot::Armed { id, phase, .. } = &mut *self.owner.lock() {
            if *id == self.id {
                debug!(pick_id = %id, from = ?phase, to = ?next, "Pick phase");
                *phase = next;
            }
        }
    }
}

impl Drop for PickTicket<'_> {
    fn drop(&mut self) {
        let mut slot = self.owner.lock();
        if matches!(&*slot, Slot::Armed { id, .. } if *id == self.id) {
            *slot = Slot::Idle;
            debug!(pick_id = %self.id, "Pick slot cleared");
        }
    }
}
