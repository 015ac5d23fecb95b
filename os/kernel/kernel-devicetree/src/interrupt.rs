use core::fmt;

/// Largest `#interrupt-cells` value accepted (`GICv3` with PPI partitions uses 4).
pub const MAX_INTERRUPT_CELLS: usize = 4;

/// One entry of an `interrupts` property, still in the interrupt parent's
/// encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InterruptSpecifier {
    cells: [u32; MAX_INTERRUPT_CELLS],
    len: usize,
}

impl InterruptSpecifier {
    /// Returns `None` if `cells` is empty or longer than
    /// [`MAX_INTERRUPT_CELLS`].
    #[must_use]
    pub fn new(cells: &[u32]) -> Option<Self> {
        if cells.is_empty() || cells.len() > MAX_INTERRUPT_CELLS {
            return None;
        }
        let mut buf = [0; MAX_INTERRUPT_CELLS];
        buf[..cells.len()].copy_from_slice(cells);
        Some(Self {
            cells: buf,
            len: cells.len(),
        })
    }

    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.cells[..self.len]
    }
}

impl fmt::Debug for InterruptSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for cell in self.cells() {
            list.entry(&format_args!("{cell:#x}"));
        }
        list.finish()
    }
}

/// Translates interrupt specifiers into the kernel's global line numbers.
///
/// Implemented by the kernel for each interrupt controller; a device hands
/// out the domain of its interrupt parent.
pub trait InterruptDomain {
    /// Returns `None` if the specifier is malformed for this controller or
    /// names a line that does not exist.
    fn translate(&self, spec: &InterruptSpecifier) -> Option<u32>;
}
