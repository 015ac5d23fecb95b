use crate::PhysicalAddress;
use core::fmt;

/// A contiguous range of physical memory: `[base, base + len)`.
///
/// This is the shape in which firmware describes device resources, e.g. a
/// device-tree `reg` entry or an address returned by an ACPI method combined
/// with a size known to the driver.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalRegion {
    base: PhysicalAddress,
    len: u64,
}

impl PhysicalRegion {
    #[inline]
    #[must_use]
    pub const fn new(base: PhysicalAddress, len: u64) -> Self {
        Self { base, len }
    }

    #[inline]
    #[must_use]
    pub const fn base(&self) -> PhysicalAddress {
        self.base
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exclusive end address, or `None` if the region wraps the address space.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Option<PhysicalAddress> {
        self.base.checked_add(self.len)
    }

    /// A region is usable if it is non-empty, not at address zero and does
    /// not wrap around.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !self.is_empty() && !self.base.is_null() && self.end().is_some()
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, pa: PhysicalAddress) -> bool {
        let start = self.base.as_u64();
        pa.as_u64() >= start && pa.as_u64() - start < self.len
    }

    /// The leading `len` bytes of this region; never grows it.
    #[inline]
    #[must_use]
    pub const fn truncate(&self, len: u64) -> Self {
        let len = if len < self.len { len } else { self.len };
        Self::new(self.base, len)
    }
}

impl fmt::Debug for PhysicalRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicalRegion")
            .field("base", &self.base)
            .field("len", &format_args!("{:#x}", self.len))
            .finish()
    }
}

impl fmt::Display for PhysicalRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}+{:#x}]", self.base, self.len)
    }
}
