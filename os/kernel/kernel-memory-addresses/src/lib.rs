//! # Physical Memory Address Types
//!
//! Strongly typed wrappers for physical addresses and the MMIO/RAM regions
//! firmware hands to drivers.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`PhysicalAddress`] | A raw 64-bit physical address (RAM or MMIO). |
//! | [`PhysicalRegion`] | A base address plus a length in bytes. |
//!
//! Firmware descriptions (ACPI methods, device-tree `reg` properties) produce
//! these values; a mapper turns them into virtual pointers. Keeping the two
//! apart in the type system prevents a physical address from ever being
//! dereferenced directly.
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let region = PhysicalRegion::new(PhysicalAddress::new(0xFEE0_0000), 0x1000);
//! assert_eq!(region.end(), Some(PhysicalAddress::new(0xFEE0_1000)));
//!
//! let head = region.truncate(16);
//! assert_eq!(head.len(), 16);
//! assert_eq!(head.base(), region.base());
//! ```
//!
//! ## Design Notes
//!
//! - The types are `#[repr(transparent)]`/`Copy` and implement `Eq`, `Ord`
//!   and `Hash`, so they can be used as map keys.
//! - All helpers are `const fn` and never panic; arithmetic that could
//!   overflow returns `Option`.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod physical_address;
mod physical_region;

pub use physical_address::PhysicalAddress;
pub use physical_region::PhysicalRegion;
