//! Discovery backends.
//!
//! Each backend locates the identifier, maps it, seeds the pool and installs
//! a change notification, recording every acquired resource in the
//! [`DeviceState`] so that dropping the state undoes a partial setup.

#[cfg(feature = "acpi")]
mod acpi;
#[cfg(not(feature = "acpi"))]
mod acpi_stub;
mod devicetree;

#[cfg(feature = "acpi")]
pub use acpi::DescriptorTableBackend;
#[cfg(not(feature = "acpi"))]
pub use acpi_stub::DescriptorTableBackend;
pub use devicetree::StructuredTreeBackend;

use crate::buffer::IdBuffer;
use crate::entropy::EntropyForwarder;
use crate::error::Error;
use crate::io::IoMapping;
use crate::platform::{PlatformDevice, Services};
use crate::state::{BackendChoice, DeviceState};
use crate::tracker::Tracker;
use kernel_memory_addresses::PhysicalRegion;
use log::{debug, warn};

pub trait DiscoveryBackend {
    const CHOICE: BackendChoice;

    /// Bind `device`, storing acquired resources in `state`.
    ///
    /// # Errors
    /// Any setup failure. Resources already stored in `state` are released
    /// when the caller drops it.
    fn setup(
        device: &dyn PlatformDevice,
        services: &Services,
        state: &mut DeviceState,
    ) -> Result<(), Error>;
}

/// Map the identifier and forward its current value.
fn map_and_seed(services: &Services, region: PhysicalRegion) -> Result<Tracker, Error> {
    // SAFETY: Firmware describes this region as the generation ID buffer.
    let mapping = unsafe { IoMapping::new(services.io, region) }.map_err(|err| {
        warn!("vmgenid: cannot map {region}: {err}");
        Error::MapFailure(region.base())
    })?;
    debug!("vmgenid: identifier mapped at {region}");
    let buffer = IdBuffer::new(mapping).ok_or(Error::MapFailure(region.base()))?;
    let forwarder = EntropyForwarder::new(services.entropy, services.listener);
    Ok(Tracker::seed(buffer, forwarder))
}
