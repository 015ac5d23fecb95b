//! Shared interrupt lines.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

/// A platform interrupt number after domain translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IrqLine(pub u32);

impl fmt::Display for IrqLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IRQ {}", self.0)
    }
}

/// What a handler on a shared line reports back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqReturn {
    /// The interrupt was not ours, or there was nothing to do.
    None,
    Handled,
}

/// Callback run in interrupt context. Must not block or allocate.
pub trait IrqHandler: Send + Sync {
    fn handle(&self, line: IrqLine) -> IrqReturn;
}

/// The interrupt controller's registration interface.
pub trait IrqController: Sync {
    /// Attach `handler` to `line`, which may be shared with other devices.
    ///
    /// # Errors
    /// Returns an [`IrqError`] if the line is invalid, claimed exclusively,
    /// or the controller cannot allocate bookkeeping.
    fn request_shared(
        &self,
        line: IrqLine,
        name: &'static str,
        handler: Arc<dyn IrqHandler>,
    ) -> Result<IrqRegistration, IrqError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IrqError {
    #[error("{0} does not exist")]
    InvalidLine(IrqLine),
    #[error("{0} is claimed exclusively")]
    Busy(IrqLine),
    #[error("out of memory")]
    NoMemory,
}

/// Proof of an installed interrupt handler.
///
/// Dropping it frees the handler; once the drop returns the handler is no
/// longer invoked.
#[must_use = "dropping the registration frees the interrupt handler"]
pub struct IrqRegistration {
    line: IrqLine,
    free: Option<Box<dyn FnOnce() + Send>>,
}

impl IrqRegistration {
    /// Wrap the controller's release routine for `line`.
    pub fn new(line: IrqLine, free: impl FnOnce() + Send + 'static) -> Self {
        Self {
            line,
            free: Some(Box::new(free)),
        }
    }

    #[must_use]
    pub const fn line(&self) -> IrqLine {
        self.line
    }
}

impl Drop for IrqRegistration {
    fn drop(&mut self) {
        if let Some(free) = self.free.take() {
            free();
        }
    }
}

impl fmt::Debug for IrqRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrqRegistration")
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}
