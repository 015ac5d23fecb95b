//! Driver registration and per-device lifecycle.
//!
//! The bus calls [`Driver::probe`] for every device whose ACPI ID or
//! compatible string appears in the match tables, and [`Driver::remove`] when
//! the device goes away. A successful probe attaches a [`DeviceState`] to the
//! device; removing it tears everything down.

use crate::backend::{DescriptorTableBackend, DiscoveryBackend, StructuredTreeBackend};
use crate::error::Error;
use crate::platform::{PlatformDevice, Services};
use crate::state::{BackendChoice, DeviceState};
use crate::DRIVER_NAME;
use log::{info, warn};

/// ACPI hardware IDs served by this driver, compared case-insensitively.
pub const ACPI_MATCH_TABLE: &[&str] = &["VMGENCTR", "VM_GEN_COUNTER"];

/// Device-tree compatible strings served by this driver.
pub const OF_MATCH_TABLE: &[&str] = &["microsoft,vmgenid"];

/// ACPI method returning the identifier's physical address.
pub const ACPI_ADDR_METHOD: &str = "ADDR";

/// Trait implemented by platform drivers.
pub trait Driver: Sync {
    fn name(&self) -> &'static str;
    fn acpi_ids(&self) -> &'static [&'static str];
    fn of_compatible(&self) -> &'static [&'static str];

    /// Bind `device`.
    ///
    /// # Errors
    /// The reason the device could not be bound.
    fn probe(&self, device: &dyn PlatformDevice) -> Result<(), Error>;

    /// Unbind `device`, releasing everything `probe` acquired.
    fn remove(&self, device: &dyn PlatformDevice);
}

/// The generation ID driver.
#[derive(Clone, Copy)]
pub struct VmGenIdDriver {
    services: Services,
}

impl VmGenIdDriver {
    #[must_use]
    pub const fn new(services: Services) -> Self {
        Self { services }
    }

    /// `true` if `device` is one this driver serves.
    #[must_use]
    pub fn matches(&self, device: &dyn PlatformDevice) -> bool {
        if device.originates_from_structured_tree() {
            return device.of_node().is_some_and(|node| {
                node.is_available() && OF_MATCH_TABLE.iter().any(|c| node.is_compatible(c))
            });
        }

        #[cfg(feature = "acpi")]
        {
            device
                .acpi_companion()
                .and_then(|acpi| kernel_acpi::id::match_device(ACPI_MATCH_TABLE, acpi))
                .is_some()
        }
        #[cfg(not(feature = "acpi"))]
        {
            false
        }
    }

    /// Set up `device` with the backend matching its origin and attach the
    /// resulting state to it.
    ///
    /// On failure nothing stays mapped or registered, and nothing is attached.
    ///
    /// # Errors
    /// Whatever the selected backend reported.
    pub fn instantiate(&self, device: &dyn PlatformDevice) -> Result<(), Error> {
        let result = match BackendChoice::for_device(device) {
            BackendChoice::DescriptorTable => self.bind::<DescriptorTableBackend>(device),
            BackendChoice::StructuredTree => self.bind::<StructuredTreeBackend>(device),
        };

        match result {
            Ok(state) => {
                info!("vmgenid: bound {} via {}", device.name(), state.choice());
                device.attach(state);
                Ok(())
            }
            Err(err) => {
                warn!("vmgenid: failed to bind {}: {err}", device.name());
                Err(err)
            }
        }
    }

    fn bind<B: DiscoveryBackend>(
        &self,
        device: &dyn PlatformDevice,
    ) -> Result<DeviceState, Error> {
        let mut state = DeviceState::new(B::CHOICE);
        B::setup(device, &self.services, &mut state)?;
        Ok(state)
    }
}

impl Driver for VmGenIdDriver {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn acpi_ids(&self) -> &'static [&'static str] {
        ACPI_MATCH_TABLE
    }

    fn of_compatible(&self) -> &'static [&'static str] {
        OF_MATCH_TABLE
    }

    fn probe(&self, device: &dyn PlatformDevice) -> Result<(), Error> {
        self.instantiate(device)
    }

    fn remove(&self, device: &dyn PlatformDevice) {
        if let Some(state) = device.detach() {
            info!("vmgenid: unbinding {}", device.name());
            drop(state);
        }
    }
}
