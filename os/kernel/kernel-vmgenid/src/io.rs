//! Mapping of the identifier's physical memory into the kernel.

use core::ptr::NonNull;
use kernel_memory_addresses::PhysicalRegion;

/// Maps device or firmware-reserved physical memory for CPU access.
///
/// The kernel's virtual memory manager implements this; the driver only ever
/// asks for small, read-mostly windows.
pub trait PhysMap: Sync {
    /// Map `region` and return a pointer to its first byte.
    ///
    /// # Errors
    /// Returns a [`MapError`] if the region cannot be mapped.
    ///
    /// # Safety
    /// The region must describe memory the caller is entitled to access, and
    /// must not overlap memory owned by the allocator.
    unsafe fn map_io(&self, region: PhysicalRegion) -> Result<NonNull<u8>, MapError>;

    /// Release a mapping created by [`map_io`](Self::map_io).
    ///
    /// # Safety
    /// `ptr` and `len` must come from a previous successful `map_io` on this
    /// mapper, and the pointer must not be used afterwards.
    unsafe fn unmap_io(&self, ptr: NonNull<u8>, len: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("region is empty, wraps, or exceeds the address space")]
    InvalidRegion,
    #[error("no virtual address space left for the mapping")]
    NoVirtualSpace,
    #[error("out of memory for page tables")]
    NoMemory,
}

/// An owned, read-only view of mapped physical memory.
///
/// Unmapped on drop.
pub struct IoMapping {
    mapper: &'static dyn PhysMap,
    ptr: NonNull<u8>,
    region: PhysicalRegion,
}

// SAFETY: The mapping is never written through and every access is a
// volatile read of plain bytes, which is valid from any CPU.
unsafe impl Send for IoMapping {}
// SAFETY: See above; shared access only performs volatile reads.
unsafe impl Sync for IoMapping {}

impl IoMapping {
    /// Map `region` through `mapper`.
    ///
    /// # Errors
    /// [`MapError::InvalidRegion`] if the region is empty, wraps, or does
    /// not fit the address space; otherwise whatever the mapper reports.
    ///
    /// # Safety
    /// Same contract as [`PhysMap::map_io`].
    pub unsafe fn new(
        mapper: &'static dyn PhysMap,
        region: PhysicalRegion,
    ) -> Result<Self, MapError> {
        if !region.is_valid() || usize::try_from(region.len()).is_err() {
            return Err(MapError::InvalidRegion);
        }

        // SAFETY: Forwarded from the caller.
        let ptr = unsafe { mapper.map_io(region)? };
        Ok(Self {
            mapper,
            ptr,
            region,
        })
    }

    #[must_use]
    pub const fn region(&self) -> PhysicalRegion {
        self.region
    }

    /// Length of the mapping in bytes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn len(&self) -> usize {
        // Checked against usize in `new`.
        self.region.len() as usize
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the first `out.len()` bytes of the mapping with volatile reads.
    ///
    /// The hypervisor may rewrite the memory at any moment, so every byte is
    /// loaded individually and never cached by the compiler.
    ///
    /// # Panics
    /// If `out` is longer than the mapping.
    pub fn read_volatile_into(&self, out: &mut [u8]) {
        assert!(out.len() <= self.len(), "read past end of mapping");
        let base = self.ptr.as_ptr().cast_const();
        for (i, byte) in out.iter_mut().enumerate() {
            // SAFETY: `i < self.len()` and the mapping is live until drop.
            *byte = unsafe { base.add(i).read_volatile() };
        }
    }
}

impl Drop for IoMapping {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from `map_io` on the same mapper with this length
        // and is not used after this point.
        unsafe { self.mapper.unmap_io(self.ptr, self.len()) };
    }
}

impl core::fmt::Debug for IoMapping {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IoMapping")
            .field("region", &self.region)
            .field("ptr", &self.ptr)
            .finish_non_exhaustive()
    }
}
