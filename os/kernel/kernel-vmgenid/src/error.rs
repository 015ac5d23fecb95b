use crate::irq::IrqError;
#[cfg(feature = "acpi")]
use kernel_acpi::AcpiError;
use kernel_memory_addresses::PhysicalAddress;

/// Why a device could not be bound.
///
/// Every variant is a setup-time failure; by the time one is returned, all
/// partially acquired resources have been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The device-tree node has no usable `reg` entry.
    #[error("device declares no usable generation ID memory resource")]
    MissingResource,
    /// The device-tree node has no usable `interrupts` entry.
    #[error("device declares no interrupt")]
    MissingInterrupt,
    /// The ACPI `ADDR` method is missing or returned a malformed object.
    #[error("ACPI generation ID descriptor is missing or malformed")]
    InvalidDescriptor,
    /// The buffer at the given address could not be mapped.
    #[error("failed to map generation ID buffer at {0}")]
    MapFailure(PhysicalAddress),
    /// The notification source refused the handler.
    #[error("failed to register change notification")]
    RegistrationFailure,
    /// The device came from ACPI but ACPI support is not built in.
    #[error("ACPI support is not built into this driver")]
    Unsupported,
    #[error("out of memory")]
    OutOfMemory,
}

/// Conversion for notify-handler installation failures.
#[cfg(feature = "acpi")]
impl From<AcpiError> for Error {
    fn from(value: AcpiError) -> Self {
        match value {
            AcpiError::NoMemory => Self::OutOfMemory,
            _ => Self::RegistrationFailure,
        }
    }
}

/// Conversion for interrupt registration failures.
impl From<IrqError> for Error {
    fn from(value: IrqError) -> Self {
        match value {
            IrqError::NoMemory => Self::OutOfMemory,
            IrqError::InvalidLine(_) | IrqError::Busy(_) => Self::RegistrationFailure,
        }
    }
}
