use super::DiscoveryBackend;
use crate::error::Error;
use crate::platform::{PlatformDevice, Services};
use crate::state::{BackendChoice, DeviceState};
use log::warn;

/// Placeholder used when the driver is built without ACPI support.
pub struct DescriptorTableBackend;

impl DiscoveryBackend for DescriptorTableBackend {
    const CHOICE: BackendChoice = BackendChoice::DescriptorTable;

    fn setup(
        device: &dyn PlatformDevice,
        _services: &Services,
        _state: &mut DeviceState,
    ) -> Result<(), Error> {
        warn!(
            "vmgenid: {} is an ACPI device but ACPI support is disabled",
            device.name()
        );
        Err(Error::Unsupported)
    }
}
