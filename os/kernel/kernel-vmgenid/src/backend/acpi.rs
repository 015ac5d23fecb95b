use super::{DiscoveryBackend, map_and_seed};
use crate::driver::ACPI_ADDR_METHOD;
use crate::error::Error;
use crate::platform::{PlatformDevice, Services};
use crate::state::{BackendChoice, DeviceState, NotificationRegistration};
use crate::tracker::Tracker;
use crate::VMGENID_SIZE;
use alloc::sync::Arc;
use kernel_acpi::{NOTIFY_DEVICE_SPECIFIC, NotifyHandler, decode_address};
use kernel_memory_addresses::PhysicalRegion;
use log::{debug, warn};

/// Finds the identifier through the ACPI `ADDR` method and listens for
/// device notifications.
pub struct DescriptorTableBackend;

impl DiscoveryBackend for DescriptorTableBackend {
    const CHOICE: BackendChoice = BackendChoice::DescriptorTable;

    fn setup(
        device: &dyn PlatformDevice,
        services: &Services,
        state: &mut DeviceState,
    ) -> Result<(), Error> {
        let Some(acpi) = device.acpi_companion() else {
            warn!("vmgenid: {} has no ACPI companion", device.name());
            return Err(Error::InvalidDescriptor);
        };

        let base = acpi
            .evaluate(ACPI_ADDR_METHOD)
            .and_then(|object| decode_address(&object))
            .map_err(|err| {
                warn!("vmgenid: {}: bad {ACPI_ADDR_METHOD}: {err}", device.name());
                Error::InvalidDescriptor
            })?;

        let region = PhysicalRegion::new(base, VMGENID_SIZE as u64);
        let tracker = state.track(map_and_seed(services, region)?);

        let registration = acpi.install_notify_handler(Arc::new(AcpiNotify { tracker }))?;
        state.register(NotificationRegistration::Notify(registration));
        Ok(())
    }
}

struct AcpiNotify {
    tracker: Arc<Tracker>,
}

impl NotifyHandler for AcpiNotify {
    fn notify(&self, value: u32) {
        if value != NOTIFY_DEVICE_SPECIFIC {
            debug!("vmgenid: unexpected notify value {value:#x}, checking anyway");
        }
        let _ = self.tracker.refresh();
    }
}
