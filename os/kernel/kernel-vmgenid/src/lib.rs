//! # Virtual Machine Generation ID Driver
//!
//! Hypervisors expose a 128-bit "generation ID" in guest memory and change it
//! whenever the virtual machine is cloned, forked or restored from a
//! snapshot. Any random value derived before such an event (keys, nonces,
//! session IDs) now exists in more than one running copy of the machine. This
//! crate watches the identifier and feeds every new value into the kernel's
//! entropy pool so the copies diverge again.
//!
//! ## Architecture
//!
//! ```text
//!        PlatformDevice (from ACPI or device-tree enumeration)
//!                 │
//!          VmGenIdDriver::instantiate
//!                 │ BackendChoice::for_device
//!        ┌────────┴─────────┐
//!  DescriptorTableBackend   StructuredTreeBackend
//!  (ACPI "ADDR" + Notify)   (reg + shared interrupt)
//!        └────────┬─────────┘
//!                 │ map, seed, register
//!             DeviceState ── owns ──► Tracker ──► IdBuffer (mapped memory)
//!                 │                     │
//!     NotificationRegistration          └──► EntropyForwarder ──► EntropyPool
//! ```
//!
//! ## Key Components
//!
//! * [`IdBuffer`]: volatile, torn-read-safe reads of the mapped identifier.
//! * [`EntropyForwarder`]: hands identifiers to the [`EntropyPool`] and tells
//!   an optional [`GenerationListener`] about changes.
//! * [`Tracker`]: the re-read-and-forward sequence under a spin lock.
//! * [`DescriptorTableBackend`] / [`StructuredTreeBackend`]: discovery and
//!   notification wiring for ACPI and device-tree platforms.
//! * [`VmGenIdDriver`]: picks the backend and owns the resulting
//!   [`DeviceState`] for the lifetime of the device.
//!
//! ## Features
//!
//! * `acpi` (default): builds the ACPI backend. Without it,
//!   [`DescriptorTableBackend`] is a stub that fails with
//!   [`Error::Unsupported`] and only device-tree platforms are served.
//!
//! ## Concurrency
//!
//! Notifications can arrive on several CPUs at once. The last forwarded
//! identifier is guarded by a [`kernel_sync::SpinLock`] and the buffer is read
//! while holding it, so each transition is forwarded exactly once and an
//! older value can never overtake a newer one. The notification path neither
//! allocates nor blocks.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod backend;
mod buffer;
mod driver;
mod entropy;
mod error;
mod io;
mod irq;
mod platform;
mod state;
mod tracker;

#[cfg(test)]
mod testing;

pub use backend::{DescriptorTableBackend, DiscoveryBackend, StructuredTreeBackend};
pub use buffer::{IdBuffer, STABLE_READ_ATTEMPTS};
pub use driver::{ACPI_ADDR_METHOD, ACPI_MATCH_TABLE, Driver, OF_MATCH_TABLE, VmGenIdDriver};
pub use entropy::{EntropyForwarder, EntropyPool, GenerationListener};
pub use error::Error;
pub use io::{IoMapping, MapError, PhysMap};
pub use irq::{IrqController, IrqError, IrqHandler, IrqLine, IrqRegistration, IrqReturn};
pub use platform::{PlatformDevice, Services};
pub use state::{BackendChoice, DeviceState, NotificationRegistration};
pub use tracker::{Refresh, Tracker};

#[cfg(feature = "acpi")]
pub use kernel_acpi;
pub use kernel_devicetree;
pub use kernel_memory_addresses;

/// Size of the generation identifier in bytes.
///
/// Both discovery mechanisms describe the same 128-bit value; a device-tree
/// region larger than this is truncated.
pub const VMGENID_SIZE: usize = 16;

/// The generation identifier as read from the device.
pub type GenerationId = [u8; VMGENID_SIZE];

/// Name used for interrupt registration and log messages.
pub const DRIVER_NAME: &str = "vmgenid";
