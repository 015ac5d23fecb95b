use crate::GenerationId;
use log::trace;

/// The kernel entropy pool.
pub trait EntropyPool: Sync {
    /// Mix device data into the pool without crediting entropy.
    fn mix_in(&self, bytes: &[u8]);

    /// Mix in a value that proves the machine was duplicated.
    ///
    /// Pools that track fork events should reseed immediately here. The
    /// default treats it like any other input.
    fn mix_in_fork(&self, bytes: &[u8]) {
        self.mix_in(bytes);
    }
}

/// Observer for generation changes, e.g. to emit a `NEW_VMGENID=1` uevent.
///
/// Called in notification context after the pool has been reseeded.
pub trait GenerationListener: Sync {
    fn new_generation(&self);
}

/// Hands identifiers to the pool.
///
/// The identifier bytes are forwarded verbatim; the pool does the mixing.
#[derive(Clone, Copy)]
pub struct EntropyForwarder {
    pool: &'static dyn EntropyPool,
    listener: Option<&'static dyn GenerationListener>,
}

impl EntropyForwarder {
    #[must_use]
    pub const fn new(
        pool: &'static dyn EntropyPool,
        listener: Option<&'static dyn GenerationListener>,
    ) -> Self {
        Self { pool, listener }
    }

    /// Seed the pool with the value found at bind time.
    pub fn forward_initial(&self, id: &GenerationId) {
        trace!("vmgenid: seeding entropy pool");
        self.pool.mix_in(id);
    }

    /// Forward a changed value and notify the listener.
    pub fn forward_change(&self, id: &GenerationId) {
        self.pool.mix_in_fork(id);
        if let Some(listener) = self.listener {
            listener.new_generation();
        }
    }
}

impl core::fmt::Debug for EntropyForwarder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntropyForwarder")
            .field("listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}
