//! Fakes for unit tests.

use crate::entropy::{EntropyPool, GenerationListener};
use crate::io::{MapError, PhysMap};
use core::ptr::NonNull;
use kernel_memory_addresses::{PhysicalAddress, PhysicalRegion};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Host memory posing as guest-physical memory.
///
/// Its host address doubles as its "physical" address, so
/// [`IdentityMapper`] can hand it out directly.
pub struct GuestMemory {
    cells: Box<[AtomicU8]>,
}

impl GuestMemory {
    pub fn leak(initial: &[u8]) -> &'static Self {
        let cells = initial.iter().map(|&b| AtomicU8::new(b)).collect();
        Box::leak(Box::new(Self { cells }))
    }

    pub fn region(&self) -> PhysicalRegion {
        PhysicalRegion::new(
            PhysicalAddress::new(self.cells.as_ptr() as u64),
            self.cells.len() as u64,
        )
    }

    pub fn write(&self, bytes: &[u8]) {
        for (cell, &b) in self.cells.iter().zip(bytes) {
            cell.store(b, Ordering::SeqCst);
        }
    }
}

#[derive(Default)]
pub struct IdentityMapper {
    mapped: AtomicUsize,
    unmapped: AtomicUsize,
}

impl IdentityMapper {
    pub fn leak() -> &'static Self {
        Box::leak(Box::default())
    }

    pub fn live(&self) -> usize {
        self.mapped.load(Ordering::SeqCst) - self.unmapped.load(Ordering::SeqCst)
    }
}

impl PhysMap for IdentityMapper {
    unsafe fn map_io(&self, region: PhysicalRegion) -> Result<NonNull<u8>, MapError> {
        let ptr = NonNull::new(region.base().as_u64() as usize as *mut u8)
            .ok_or(MapError::InvalidRegion)?;
        self.mapped.fetch_add(1, Ordering::SeqCst);
        Ok(ptr)
    }

    unsafe fn unmap_io(&self, _ptr: NonNull<u8>, _len: usize) {
        self.unmapped.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mixed {
    Seed(Vec<u8>),
    Fork(Vec<u8>),
}

#[derive(Default)]
pub struct RecordingPool {
    mixed: Mutex<Vec<Mixed>>,
}

impl RecordingPool {
    pub fn leak() -> &'static Self {
        Box::leak(Box::default())
    }

    pub fn take(&self) -> Vec<Mixed> {
        std::mem::take(&mut *self.mixed.lock().unwrap())
    }
}

impl EntropyPool for RecordingPool {
    fn mix_in(&self, bytes: &[u8]) {
        self.mixed.lock().unwrap().push(Mixed::Seed(bytes.to_vec()));
    }

    fn mix_in_fork(&self, bytes: &[u8]) {
        self.mixed.lock().unwrap().push(Mixed::Fork(bytes.to_vec()));
    }
}

#[derive(Default)]
pub struct CountingListener(AtomicUsize);

impl CountingListener {
    pub fn leak() -> &'static Self {
        Box::leak(Box::default())
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl GenerationListener for CountingListener {
    fn new_generation(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
