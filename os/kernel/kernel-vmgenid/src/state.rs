use crate::irq::IrqRegistration;
use crate::platform::PlatformDevice;
use crate::tracker::Tracker;
use crate::GenerationId;
use alloc::sync::Arc;
use core::fmt;
#[cfg(feature = "acpi")]
use kernel_acpi::NotifyRegistration;
use kernel_memory_addresses::PhysicalRegion;

/// Which discovery mechanism bound a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// ACPI: `ADDR` method and device notifications.
    DescriptorTable,
    /// Device tree: `reg` resource and a shared interrupt.
    StructuredTree,
}

impl BackendChoice {
    #[must_use]
    pub fn for_device(device: &dyn PlatformDevice) -> Self {
        if device.originates_from_structured_tree() {
            Self::StructuredTree
        } else {
            Self::DescriptorTable
        }
    }
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DescriptorTable => "ACPI",
            Self::StructuredTree => "device tree",
        })
    }
}

/// The handle that keeps a change-notification handler installed.
#[derive(Debug)]
pub enum NotificationRegistration {
    #[cfg(feature = "acpi")]
    Notify(NotifyRegistration),
    Interrupt(IrqRegistration),
}

/// Everything the driver holds for one bound device.
///
/// Dropping it tears down in reverse order of setup: the notification
/// handler is removed first, then the buffer is unmapped.
pub struct DeviceState {
    choice: BackendChoice,
    registration: Option<NotificationRegistration>,
    tracker: Option<Arc<Tracker>>,
}

impl DeviceState {
    #[must_use]
    pub const fn new(choice: BackendChoice) -> Self {
        Self {
            choice,
            registration: None,
            tracker: None,
        }
    }

    #[must_use]
    pub const fn choice(&self) -> BackendChoice {
        self.choice
    }

    /// Take ownership of a seeded tracker and return a handle for the
    /// notification handler.
    pub(crate) fn track(&mut self, tracker: Tracker) -> Arc<Tracker> {
        let tracker = Arc::new(tracker);
        self.tracker = Some(Arc::clone(&tracker));
        tracker
    }

    pub(crate) fn register(&mut self, registration: NotificationRegistration) {
        self.registration = Some(registration);
    }

    /// `true` once change notifications are being delivered.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.registration.is_some()
    }

    /// The mapped buffer's physical region, once mapped.
    #[must_use]
    pub fn region(&self) -> Option<PhysicalRegion> {
        self.tracker.as_ref().map(|t| t.buffer_region())
    }

    /// The last identifier forwarded to the pool.
    ///
    /// `None` before seeding, or if a notification is running right now.
    /// Safe to call with interrupts enabled.
    #[must_use]
    pub fn last_id(&self) -> Option<GenerationId> {
        self.tracker.as_ref().and_then(|t| t.last_id())
    }
}

impl Drop for DeviceState {
    fn drop(&mut self) {
        // Handler must be gone before the memory it reads is unmapped.
        drop(self.registration.take());
        drop(self.tracker.take());
    }
}

impl fmt::Debug for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceState")
            .field("choice", &self.choice)
            .field("region", &self.region())
            .field("armed", &self.is_armed())
            .finish()
    }
}
