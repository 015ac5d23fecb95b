//! Fake platform for exercising the driver end to end.
#![allow(dead_code)]

use kernel_devicetree::{InterruptDomain, InterruptSpecifier, Node, Property};
use kernel_memory_addresses::{PhysicalAddress, PhysicalRegion};
use kernel_vmgenid::{
    DeviceState, EntropyPool, GenerationListener, IrqController, IrqError, IrqHandler, IrqLine,
    IrqRegistration, IrqReturn, MapError, PhysMap, PlatformDevice, Services, VmGenIdDriver,
};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[cfg(feature = "acpi")]
use kernel_vmgenid::kernel_acpi::{
    AcpiDevice, AcpiError, AcpiObject, NotifyHandler, NotifyRegistration,
};

fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// Host memory standing in for the hypervisor-owned buffer. Its host address
/// is used as its physical address.
pub struct GuestMemory {
    cells: Box<[AtomicU8]>,
}

impl GuestMemory {
    pub fn leak(initial: &[u8]) -> &'static Self {
        leak(Self {
            cells: initial.iter().map(|&b| AtomicU8::new(b)).collect(),
        })
    }

    pub fn address(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.cells.as_ptr() as u64)
    }

    pub fn write(&self, bytes: &[u8]) {
        for (cell, &b) in self.cells.iter().zip(bytes) {
            cell.store(b, Ordering::SeqCst);
        }
    }
}

#[derive(Default)]
pub struct IdentityMapper {
    mapped: AtomicUsize,
    unmapped: AtomicUsize,
    fail: AtomicBool,
    last_region: Mutex<Option<PhysicalRegion>>,
}

impl IdentityMapper {
    pub fn live(&self) -> usize {
        self.mapped.load(Ordering::SeqCst) - self.unmapped.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn last_region(&self) -> Option<PhysicalRegion> {
        *self.last_region.lock().unwrap()
    }
}

impl PhysMap for IdentityMapper {
    unsafe fn map_io(&self, region: PhysicalRegion) -> Result<NonNull<u8>, MapError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(MapError::NoVirtualSpace);
        }
        let ptr = NonNull::new(region.base().as_u64() as usize as *mut u8)
            .ok_or(MapError::InvalidRegion)?;
        *self.last_region.lock().unwrap() = Some(region);
        self.mapped.fetch_add(1, Ordering::SeqCst);
        Ok(ptr)
    }

    unsafe fn unmap_io(&self, _ptr: NonNull<u8>, _len: usize) {
        self.unmapped.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mixed {
    Seed(Vec<u8>),
    Fork(Vec<u8>),
}

#[derive(Default)]
pub struct RecordingPool {
    mixed: Mutex<Vec<Mixed>>,
}

impl RecordingPool {
    pub fn take(&self) -> Vec<Mixed> {
        std::mem::take(&mut *self.mixed.lock().unwrap())
    }

    pub fn forks(&self) -> Vec<Vec<u8>> {
        self.mixed
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                Mixed::Fork(bytes) => Some(bytes.clone()),
                Mixed::Seed(_) => None,
            })
            .collect()
    }
}

impl EntropyPool for RecordingPool {
    fn mix_in(&self, bytes: &[u8]) {
        self.mixed.lock().unwrap().push(Mixed::Seed(bytes.to_vec()));
    }

    fn mix_in_fork(&self, bytes: &[u8]) {
        self.mixed.lock().unwrap().push(Mixed::Fork(bytes.to_vec()));
    }
}

#[derive(Default)]
pub struct CountingListener(AtomicUsize);

impl CountingListener {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl GenerationListener for CountingListener {
    fn new_generation(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

type HandlerTable = Arc<Mutex<Vec<(usize, IrqLine, Arc<dyn IrqHandler>)>>>;

/// Shared-line controller that lets tests raise interrupts by hand.
#[derive(Default)]
pub struct FakeIrqController {
    handlers: HandlerTable,
    next_id: AtomicUsize,
    refuse: Mutex<Option<IrqError>>,
    requested: Mutex<Vec<(IrqLine, &'static str)>>,
}

impl FakeIrqController {
    pub fn refuse_with(&self, err: IrqError) {
        *self.refuse.lock().unwrap() = Some(err);
    }

    pub fn installed(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    pub fn requested(&self) -> Vec<(IrqLine, &'static str)> {
        self.requested.lock().unwrap().clone()
    }

    /// Raise `line` and collect each handler's answer.
    pub fn fire(&self, line: IrqLine) -> Vec<IrqReturn> {
        let handlers: Vec<_> = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, l, _)| *l == line)
            .map(|(_, _, h)| Arc::clone(h))
            .collect();
        handlers.iter().map(|h| h.handle(line)).collect()
    }
}

impl IrqController for FakeIrqController {
    fn request_shared(
        &self,
        line: IrqLine,
        name: &'static str,
        handler: Arc<dyn IrqHandler>,
    ) -> Result<IrqRegistration, IrqError> {
        if let Some(err) = self.refuse.lock().unwrap().take() {
            return Err(err);
        }
        self.requested.lock().unwrap().push((line, name));

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.handlers.lock().unwrap().push((id, line, handler));
        let table = Arc::clone(&self.handlers);
        Ok(IrqRegistration::new(line, move || {
            table.lock().unwrap().retain(|(i, _, _)| *i != id);
        }))
    }
}

/// GIC-style translation: three cells, SPIs start at 32.
pub struct GicDomain;

impl InterruptDomain for GicDomain {
    fn translate(&self, spec: &InterruptSpecifier) -> Option<u32> {
        match spec.cells() {
            [0, spi, _flags] => Some(32 + spi),
            [1, ppi, _flags] => Some(16 + ppi),
            _ => None,
        }
    }
}

#[cfg(feature = "acpi")]
type NotifySlot = Arc<Mutex<Option<Arc<dyn NotifyHandler>>>>;

/// An ACPI namespace device with a scripted `ADDR` method.
#[cfg(feature = "acpi")]
pub struct FakeAcpiDevice {
    pub hid: String,
    pub cids: Vec<String>,
    pub addr: Option<AcpiObject>,
    pub refuse_install: Option<AcpiError>,
    handler: NotifySlot,
}

#[cfg(feature = "acpi")]
impl FakeAcpiDevice {
    pub fn new(hid: &str, addr: Option<AcpiObject>) -> Self {
        Self {
            hid: hid.into(),
            cids: Vec::new(),
            addr,
            refuse_install: None,
            handler: NotifySlot::default(),
        }
    }

    /// `ADDR` as firmware usually returns it: a package of two dwords.
    pub fn addr_package(address: PhysicalAddress) -> AcpiObject {
        AcpiObject::Package(vec![
            AcpiObject::Integer(u64::from(address.low_word())),
            AcpiObject::Integer(u64::from(address.high_word())),
        ])
    }

    pub fn has_handler(&self) -> bool {
        self.handler.lock().unwrap().is_some()
    }

    /// Deliver a notification if a handler is installed.
    pub fn notify(&self, value: u32) -> bool {
        let handler = self.handler.lock().unwrap().clone();
        handler.map(|h| h.notify(value)).is_some()
    }
}

#[cfg(feature = "acpi")]
impl AcpiDevice for FakeAcpiDevice {
    fn hardware_id(&self) -> &str {
        &self.hid
    }

    fn compatible_ids(&self) -> &[String] {
        &self.cids
    }

    fn evaluate(&self, method: &str) -> Result<AcpiObject, AcpiError> {
        match method {
            "ADDR" => self.addr.clone().ok_or(AcpiError::NotFound),
            _ => Err(AcpiError::NotFound),
        }
    }

    fn install_notify_handler(
        &self,
        handler: Arc<dyn NotifyHandler>,
    ) -> Result<NotifyRegistration, AcpiError> {
        if let Some(err) = self.refuse_install.clone() {
            return Err(err);
        }
        let mut slot = self.handler.lock().unwrap();
        if slot.is_some() {
            return Err(AcpiError::AlreadyExists);
        }
        *slot = Some(handler);
        let slot = Arc::clone(&self.handler);
        Ok(NotifyRegistration::new(move || {
            slot.lock().unwrap().take();
        }))
    }
}

/// A platform device as produced by bus enumeration.
pub struct FakeDevice {
    pub name: String,
    pub from_tree: bool,
    #[cfg(feature = "acpi")]
    pub acpi: Option<FakeAcpiDevice>,
    pub node: Option<Node>,
    pub domain: Option<GicDomain>,
    state: Mutex<Option<DeviceState>>,
}

impl FakeDevice {
    /// A device with nothing attached to it yet.
    pub fn bare(name: &str, from_tree: bool) -> Self {
        Self {
            name: name.into(),
            from_tree,
            #[cfg(feature = "acpi")]
            acpi: None,
            node: None,
            domain: None,
            state: Mutex::default(),
        }
    }

    pub fn from_tree(node: Node) -> Self {
        Self {
            node: Some(node),
            domain: Some(GicDomain),
            ..Self::bare("vmgenid@0", true)
        }
    }

    #[cfg(feature = "acpi")]
    pub fn from_acpi(acpi: FakeAcpiDevice) -> Self {
        Self {
            acpi: Some(acpi),
            ..Self::bare("VMGENCTR:00", false)
        }
    }

    pub fn is_bound(&self) -> bool {
        self.state.lock().unwrap().is_some()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&DeviceState) -> R) -> Option<R> {
        self.state.lock().unwrap().as_ref().map(f)
    }
}

impl PlatformDevice for FakeDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn originates_from_structured_tree(&self) -> bool {
        self.from_tree
    }

    #[cfg(feature = "acpi")]
    fn acpi_companion(&self) -> Option<&dyn AcpiDevice> {
        self.acpi.as_ref().map(|a| a as &dyn AcpiDevice)
    }

    fn of_node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    fn interrupt_domain(&self) -> Option<&dyn InterruptDomain> {
        self.domain.as_ref().map(|d| d as &dyn InterruptDomain)
    }

    fn attach(&self, state: DeviceState) {
        *self.state.lock().unwrap() = Some(state);
    }

    fn detach(&self) -> Option<DeviceState> {
        self.state.lock().unwrap().take()
    }
}

/// A `microsoft,vmgenid` node as QEMU generates it, pointing at `memory`.
pub fn vmgenid_node(memory: &GuestMemory, size: u64) -> Node {
    let address = memory.address();
    Node::new("vmgenid@0")
        .with_parent_cells(2, 2)
        .with_interrupt_cells(3)
        .with_property(Property::from_strs("compatible", &["microsoft,vmgenid"]))
        .with_property(Property::from_cells(
            "reg",
            &[
                address.high_word(),
                address.low_word(),
                (size >> 32) as u32,
                size as u32,
            ],
        ))
        .with_property(Property::from_cells("interrupts", &[0, 7, 4]))
}

/// The SPI in [`vmgenid_node`] after GIC translation.
pub const VMGENID_LINE: IrqLine = IrqLine(39);

/// The driver wired to recording fakes.
pub struct Platform {
    pub mapper: &'static IdentityMapper,
    pub pool: &'static RecordingPool,
    pub irq: &'static FakeIrqController,
    pub listener: &'static CountingListener,
    pub driver: VmGenIdDriver,
}

impl Platform {
    pub fn new() -> Self {
        let mapper = leak(IdentityMapper::default());
        let pool = leak(RecordingPool::default());
        let irq = leak(FakeIrqController::default());
        let listener = leak(CountingListener::default());
        let driver = VmGenIdDriver::new(Services {
            entropy: pool,
            io: mapper,
            irq,
            listener: Some(listener),
        });
        Self {
            mapper,
            pool,
            irq,
            listener,
            driver,
        }
    }
}
