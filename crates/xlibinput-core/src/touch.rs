//! Touch-id emulation.
//!
//! # Why emulate touch ids? (for beginners)
//!
//! A multi-touch panel tracks each finger in a hardware *slot*: slot 0 is the
//! first finger down, slot 1 the second, and so on.  When a finger lifts, its
//! slot is free and the next finger may reuse it.  X Input 2 instead wants a
//! *touch id* that is unique for the whole lifetime of one contact, so that a
//! client never confuses "finger lifted, new finger landed in the same slot"
//! with "same finger moved".
//!
//! libinput only reports slots, so the driver mints ids itself:
//!
//! ```text
//! slot 2 down   -> id 0  (minted)
//! slot 2 motion -> id 0  (looked up)
//! slot 2 up     -> id 0  (looked up)
//! slot 2 down   -> id 1  (minted, slot reused)
//! ```
//!
//! One table belongs to one device binding.  Two touch devices therefore
//! never overwrite each other's slot entries.

use tracing::trace;

use crate::posting::TouchId;

/// Number of concurrently tracked touch slots per device.
pub const TOUCH_MAX_SLOTS: usize = 15;

/// Maps hardware touch slots to synthetic, monotonically increasing touch ids.
#[derive(Debug, Clone, Default)]
pub struct TouchSlotTable {
    ids: [TouchId; TOUCH_MAX_SLOTS],
    next_id: u32,
}

impl TouchSlotTable {
    /// Creates a table with every slot mapped to id 0 and the counter at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a new id for `slot` on touch-down.
    ///
    /// Returns `None`, without consuming an id, when `slot` is out of range.
    pub fn begin(&mut self, slot: u32) -> Option<TouchId> {
        let entry = self.ids.get_mut(slot as usize)?;
        let id = TouchId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        *entry = id;
        trace!(slot, id = id.0, "touch id minted");
        Some(id)
    }

    /// Returns the id currently mapped to `slot`, or `None` if out of range.
    ///
    /// A slot that never saw a touch-down reports id 0.
    pub fn lookup(&self, slot: u32) -> Option<TouchId> {
        self.ids.get(slot as usize).copied()
    }

    /// The id the next touch-down will receive.
    pub fn next_id(&self) -> TouchId {
        TouchId(self.next_id)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
