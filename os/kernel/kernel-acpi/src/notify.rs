use alloc::boxed::Box;
use core::fmt;

/// The first device-specific notification value (`Notify(dev, 0x80)`).
///
/// Values `0x00..=0x7F` are reserved for generic events (bus check, device
/// check, eject request, ...).
pub const NOTIFY_DEVICE_SPECIFIC: u32 = 0x80;

/// Receives `Notify()` events for one device.
///
/// The ACPI subsystem may call this from a deferred-work context on any CPU,
/// possibly concurrently with itself; implementations must be short and must
/// not block.
pub trait NotifyHandler: Send + Sync {
    fn notify(&self, value: u32);
}

/// Keeps a notify handler installed.
///
/// Created by the ACPI subsystem's implementation of
/// [`AcpiDevice::install_notify_handler`](crate::AcpiDevice::install_notify_handler).
/// Dropping the registration removes the handler; once the drop returns,
/// no further callbacks are made.
#[must_use = "dropping the registration removes the notify handler"]
pub struct NotifyRegistration {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl NotifyRegistration {
    /// Wrap the subsystem's removal routine.
    pub fn new(remove: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

}

impl Drop for NotifyRegistration {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl fmt::Debug for NotifyRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyRegistration")
            .field("installed", &self.remove.is_some())
            .finish()
    }
}
