use crate::buffer::IdBuffer;
use crate::entropy::EntropyForwarder;
use crate::GenerationId;
use kernel_memory_addresses::PhysicalRegion;
use kernel_sync::SpinLock;
use log::{debug, trace, warn};

/// Outcome of handling one change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Refresh {
    /// A new identifier was found and forwarded.
    Changed,
    /// The identifier matches the last forwarded value.
    Unchanged,
    /// The buffer did not hold still long enough to read.
    Unsettled,
}

/// Remembers the last forwarded identifier and forwards new ones.
///
/// Shared between the device state and the registered notification handler.
#[derive(Debug)]
pub struct Tracker {
    buffer: IdBuffer,
    last_id: SpinLock<GenerationId>,
    forwarder: EntropyForwarder,
}

impl Tracker {
    /// Read the identifier once and seed the entropy pool with it.
    ///
    /// The value is forwarded unconditionally, even if it is all zeroes.
    #[must_use]
    pub fn seed(buffer: IdBuffer, forwarder: EntropyForwarder) -> Self {
        let id = buffer.read_settled().unwrap_or_else(|| {
            warn!(
                "vmgenid: identifier at {} still changing during bind",
                buffer.region()
            );
            buffer.read_once()
        });
        forwarder.forward_initial(&id);

        Self {
            buffer,
            last_id: SpinLock::new(id),
            forwarder,
        }
    }

    /// Re-read the identifier and forward it if it changed.
    ///
    /// The lock is held across read, compare, forward and store, so
    /// concurrent notifications forward each transition exactly once and in
    /// order. Callable from interrupt context.
    pub fn refresh(&self) -> Refresh {
        let mut last = self.last_id.lock();

        let Some(current) = self.buffer.read_settled() else {
            warn!("vmgenid: identifier did not settle, skipping notification");
            return Refresh::Unsettled;
        };

        if current == *last {
            trace!("vmgenid: notification without identifier change");
            return Refresh::Unchanged;
        }

        self.forwarder.forward_change(&current);
        *last = current;
        debug!("vmgenid: generation changed, entropy pool reseeded");
        Refresh::Changed
    }

    #[must_use]
    pub const fn buffer_region(&self) -> PhysicalRegion {
        self.buffer.region()
    }

    /// The last identifier handed to the pool, or `None` while a
    /// notification holds the lock.
    ///
    /// Never spins: the lock is also taken by the interrupt handler, which
    /// could preempt a waiting reader on the same CPU.
    #[must_use]
    pub fn last_id(&self) -> Option<GenerationId> {
        self.last_id.try_lock().map(|id| *id)
    }
}
