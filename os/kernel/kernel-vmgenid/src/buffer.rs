use crate::io::IoMapping;
use crate::{GenerationId, VMGENID_SIZE};
use kernel_memory_addresses::PhysicalRegion;

/// How many times a read is re-checked before the buffer is declared
/// unsettled.
///
/// The hypervisor may be rewriting the identifier while it is read; two
/// consecutive identical reads are taken as a consistent snapshot.
pub const STABLE_READ_ATTEMPTS: usize = 3;

/// The mapped generation identifier.
#[derive(Debug)]
pub struct IdBuffer {
    mapping: IoMapping,
}

impl IdBuffer {
    /// Wrap a mapping that covers at least [`VMGENID_SIZE`] bytes.
    ///
    /// Returns `None` (and unmaps) if the mapping is too short.
    #[must_use]
    pub fn new(mapping: IoMapping) -> Option<Self> {
        (mapping.len() >= VMGENID_SIZE).then_some(Self { mapping })
    }

    #[must_use]
    pub const fn region(&self) -> PhysicalRegion {
        self.mapping.region()
    }

    /// A single volatile copy of the identifier. May be torn.
    #[must_use]
    pub fn read_once(&self) -> GenerationId {
        let mut id = [0; VMGENID_SIZE];
        self.mapping.read_volatile_into(&mut id);
        id
    }

    /// Read until two consecutive copies agree.
    ///
    /// Returns `None` if the value was still moving after
    /// [`STABLE_READ_ATTEMPTS`] re-reads.
    #[must_use]
    pub fn read_settled(&self) -> Option<GenerationId> {
        settle(|| self.read_once())
    }
}

fn settle<T: PartialEq>(mut read: impl FnMut() -> T) -> Option<T> {
    let mut previous = read();
    for _ in 0..STABLE_READ_ATTEMPTS {
        let current = read();
        if current == previous {
            return Some(current);
        }
        previous = current;
    }
    None
}
