use crate::entropy::{EntropyPool, GenerationListener};
use crate::io::PhysMap;
use crate::irq::IrqController;
use crate::state::DeviceState;
#[cfg(feature = "acpi")]
use kernel_acpi::AcpiDevice;
use kernel_devicetree::{InterruptDomain, Node};

/// A device handed to the driver by platform enumeration.
///
/// Implementors need interior mutability for [`attach`](Self::attach) and
/// [`detach`](Self::detach); the bus owns the device, the driver only owns
/// what it attaches.
pub trait PlatformDevice {
    fn name(&self) -> &str;

    /// `true` if the device was enumerated from a device tree.
    fn originates_from_structured_tree(&self) -> bool;

    /// The ACPI namespace node backing this device, if any.
    #[cfg(feature = "acpi")]
    fn acpi_companion(&self) -> Option<&dyn AcpiDevice>;

    /// The device-tree node backing this device, if any.
    fn of_node(&self) -> Option<&Node>;

    /// The interrupt parent used to translate the node's `interrupts`.
    fn interrupt_domain(&self) -> Option<&dyn InterruptDomain>;

    /// Store the driver's per-device state.
    fn attach(&self, state: DeviceState);

    /// Hand the per-device state back for teardown.
    fn detach(&self) -> Option<DeviceState>;
}

/// Kernel services the driver calls into.
#[derive(Clone, Copy)]
pub struct Services {
    pub entropy: &'static dyn EntropyPool,
    pub io: &'static dyn PhysMap,
    pub irq: &'static dyn IrqController,
    pub listener: Option<&'static dyn GenerationListener>,
}
