use super::{DiscoveryBackend, map_and_seed};
use crate::error::Error;
use crate::irq::{IrqHandler, IrqLine, IrqReturn};
use crate::platform::{PlatformDevice, Services};
use crate::state::{BackendChoice, DeviceState, NotificationRegistration};
use crate::tracker::{Refresh, Tracker};
use crate::{DRIVER_NAME, VMGENID_SIZE};
use alloc::sync::Arc;
use kernel_devicetree::Node;
use log::warn;

/// Finds the identifier through the node's first `reg` entry and listens on
/// its first interrupt.
pub struct StructuredTreeBackend;

impl DiscoveryBackend for StructuredTreeBackend {
    const CHOICE: BackendChoice = BackendChoice::StructuredTree;

    fn setup(
        device: &dyn PlatformDevice,
        services: &Services,
        state: &mut DeviceState,
    ) -> Result<(), Error> {
        let Some(node) = device.of_node() else {
            warn!("vmgenid: {} has no device-tree node", device.name());
            return Err(Error::MissingResource);
        };

        let declared = node.reg(0).map_err(|err| {
            warn!("vmgenid: {}: no usable reg: {err}", node.full_name);
            Error::MissingResource
        })?;
        if declared.len() < VMGENID_SIZE as u64 || !declared.is_valid() {
            warn!(
                "vmgenid: {}: reg {declared} cannot hold a {VMGENID_SIZE}-byte identifier",
                node.full_name
            );
            return Err(Error::MissingResource);
        }

        let region = declared.truncate(VMGENID_SIZE as u64);
        let tracker = state.track(map_and_seed(services, region)?);

        let line = resolve_interrupt(device, node)?;
        let registration = services.irq.request_shared(
            line,
            DRIVER_NAME,
            Arc::new(IrqNotify { tracker }),
        )?;
        state.register(NotificationRegistration::Interrupt(registration));
        Ok(())
    }
}

fn resolve_interrupt(device: &dyn PlatformDevice, node: &Node) -> Result<IrqLine, Error> {
    let spec = node.interrupt(0).map_err(|err| {
        warn!("vmgenid: {}: no usable interrupt: {err}", node.full_name);
        Error::MissingInterrupt
    })?;
    let domain = device.interrupt_domain().ok_or_else(|| {
        warn!("vmgenid: {}: no interrupt parent", node.full_name);
        Error::MissingInterrupt
    })?;
    domain.translate(&spec).map(IrqLine).ok_or_else(|| {
        warn!("vmgenid: {}: cannot translate {spec:?}", node.full_name);
        Error::MissingInterrupt
    })
}

struct IrqNotify {
    tracker: Arc<Tracker>,
}

impl IrqHandler for IrqNotify {
    fn handle(&self, _line: IrqLine) -> IrqReturn {
        match self.tracker.refresh() {
            Refresh::Changed => IrqReturn::Handled,
            Refresh::Unchanged | Refresh::Unsettled => IrqReturn::None,
        }
    }
}
