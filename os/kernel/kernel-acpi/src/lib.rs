//! # ACPI (Advanced Configuration and Power Interface) Device Support
//!
//! This crate describes the slice of the ACPI namespace a device driver talks
//! to once the platform has enumerated a device object. It does not interpret
//! AML itself; the kernel's ACPI subsystem does that and exposes each device
//! through the [`AcpiDevice`] trait.
//!
//! ## Overview
//!
//! ```text
//! Firmware (DSDT/SSDT)
//!     ↓  AML interpreter (kernel)
//! Namespace device object (_HID, _CID, vendor methods)
//!     ↓  AcpiDevice
//! Driver
//! ```
//!
//! ## Key Components
//!
//! ### Device Identification ([`id`])
//! * **Hardware ID**: `_HID`, the primary identifier.
//! * **Compatible IDs**: `_CID`, additional identifiers a driver may bind to.
//! * **Match tables**: [`id::match_device`] checks a driver's static table
//!   against both.
//!
//! ### Evaluated Objects ([`AcpiObject`])
//! The result of evaluating a method or named object: integers, strings,
//! buffers and (nested) packages. [`decode_address`] turns the common
//! "two 32-bit words" package encoding into a [`PhysicalAddress`].
//!
//! ### Notifications ([`NotifyHandler`], [`NotifyRegistration`])
//! Firmware signals device events with AML `Notify(device, value)`. A driver
//! installs a handler and keeps the returned [`NotifyRegistration`]; dropping
//! it removes the handler again.
//!
//! ## Usage Patterns
//!
//! ```rust,ignore
//! use kernel_acpi::{AcpiDevice, decode_address};
//!
//! fn buffer_address(dev: &dyn AcpiDevice) -> Option<PhysicalAddress> {
//!     let obj = dev.evaluate("ADDR").ok()?;
//!     decode_address(&obj).ok()
//! }
//! ```
//!
//! ## Safety Considerations
//!
//! Everything returned by firmware is untrusted: element counts, integer
//! widths and addresses are validated before use and rejected with an
//! [`AcpiError`] rather than trusted.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

pub mod id;
mod notify;
mod object;

use alloc::string::String;
use alloc::sync::Arc;

pub use kernel_memory_addresses::PhysicalAddress;
pub use notify::{NOTIFY_DEVICE_SPECIFIC, NotifyHandler, NotifyRegistration};
pub use object::{AcpiObject, decode_address};

/// A device object in the ACPI namespace, as handed to a driver by the
/// kernel's ACPI bus.
pub trait AcpiDevice {
    /// The `_HID` of the device.
    fn hardware_id(&self) -> &str;

    /// The `_CID` list of the device; may be empty.
    fn compatible_ids(&self) -> &[String];

    /// Evaluate a method or named object relative to this device.
    ///
    /// # Errors
    /// [`AcpiError::NotFound`] if the device has no such object; any other
    /// variant if evaluation itself failed.
    fn evaluate(&self, method: &str) -> Result<AcpiObject, AcpiError>;

    /// Install `handler` for device notifications.
    ///
    /// The handler stays installed until the returned registration is
    /// dropped.
    ///
    /// # Errors
    /// [`AcpiError::AlreadyExists`] if a handler is already installed,
    /// [`AcpiError::NoMemory`] if the ACPI subsystem could not allocate its
    /// bookkeeping.
    fn install_notify_handler(
        &self,
        handler: Arc<dyn NotifyHandler>,
    ) -> Result<NotifyRegistration, AcpiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcpiError {
    #[error("object not found")]
    NotFound,
    #[error("unexpected object type: expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("package has {found} elements, expected {expected}")]
    PackageLength { found: usize, expected: usize },
    #[error("buffer has {found} bytes, expected {expected}")]
    BufferLength { found: usize, expected: usize },
    #[error("integer {0:#x} does not fit in 32 bits")]
    IntegerOverflow(u64),
    #[error("address is zero")]
    NullAddress,
    #[error("a notify handler is already installed")]
    AlreadyExists,
    #[error("out of memory")]
    NoMemory,
}
