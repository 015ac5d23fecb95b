use crate::interrupt::{InterruptSpecifier, MAX_INTERRUPT_CELLS};
use crate::prop::{Property, PropertyError};
use crate::{DEFAULT_ADDRESS_CELLS, DEFAULT_INTERRUPT_CELLS, DEFAULT_SIZE_CELLS};
use alloc::boxed::Box;
use alloc::vec::Vec;
use kernel_memory_addresses::{PhysicalAddress, PhysicalRegion};

/// A device node with the context needed to decode its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// `name@unit-address`, as it appears in the tree.
    pub full_name: Box<str>,
    pub props: Vec<Property>,
    /// `#address-cells` of the parent bus.
    address_cells: u32,
    /// `#size-cells` of the parent bus.
    size_cells: u32,
    /// `#interrupt-cells` of the interrupt parent.
    interrupt_cells: u32,
}

impl Node {
    #[must_use]
    pub fn new(full_name: &str) -> Self {
        Self {
            full_name: Box::from(full_name),
            props: Vec::new(),
            address_cells: DEFAULT_ADDRESS_CELLS,
            size_cells: DEFAULT_SIZE_CELLS,
            interrupt_cells: DEFAULT_INTERRUPT_CELLS,
        }
    }

    #[must_use]
    pub fn with_property(mut self, prop: Property) -> Self {
        self.props.push(prop);
        self
    }

    #[must_use]
    pub const fn with_parent_cells(mut self, address_cells: u32, size_cells: u32) -> Self {
        self.address_cells = address_cells;
        self.size_cells = size_cells;
        self
    }

    #[must_use]
    pub const fn with_interrupt_cells(mut self, interrupt_cells: u32) -> Self {
        self.interrupt_cells = interrupt_cells;
        self
    }

    /// The part of the name before `@`.
    #[must_use]
    pub fn node_name(&self) -> &str {
        self.full_name
            .split_once('@')
            .map_or(&*self.full_name, |(name, _)| name)
    }

    /// The part of the name after `@`, if any.
    #[must_use]
    pub fn unit_addr(&self) -> Option<&str> {
        self.full_name.split_once('@').map(|(_, addr)| addr)
    }

    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.props.iter().find(|p| &*p.name == name)
    }

    /// The `compatible` strings, most specific first.
    pub fn compatible(&self) -> impl Iterator<Item = &str> {
        self.get_property("compatible")
            .into_iter()
            .flat_map(Property::value_as_strlist)
    }

    #[must_use]
    pub fn is_compatible(&self, compat: &str) -> bool {
        self.compatible().any(|c| c == compat)
    }

    /// A node without `status`, or with `"okay"`/`"ok"`, is available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.get_property("status")
            .is_none_or(|p| matches!(p.value_as_str(), Ok("okay" | "ok")))
    }

    /// Number of `(address, size)` entries in `reg`.
    ///
    /// # Errors
    /// See [`Node::reg`].
    pub fn reg_count(&self) -> Result<usize, PropertyError> {
        let prop = self
            .get_property("reg")
            .ok_or(PropertyError::PropNotFound)?;
        let width = self.reg_width()?;
        if prop.data.len() % 4 != 0 || prop.cell_count() % width != 0 {
            return Err(PropertyError::InvalidPropFormat);
        }
        Ok(prop.cell_count() / width)
    }

    /// Decode entry `index` of `reg`.
    ///
    /// # Errors
    /// * [`PropertyError::PropNotFound`] if there is no `reg` property,
    /// * [`PropertyError::UnsupportedCellCount`] if the parent uses address
    ///   or size cells wider than 64 bits,
    /// * [`PropertyError::InvalidPropFormat`] if the property is ragged,
    /// * [`PropertyError::IndexOutOfRange`] if there are fewer entries.
    pub fn reg(&self, index: usize) -> Result<PhysicalRegion, PropertyError> {
        let count = self.reg_count()?;
        if index >= count {
            return Err(PropertyError::IndexOutOfRange(index));
        }

        let cells: Vec<u32> = self
            .get_property("reg")
            .ok_or(PropertyError::PropNotFound)?
            .value_as_cells()?
            .collect();
        let width = self.reg_width()?;
        let entry = &cells[index * width..(index + 1) * width];
        let (addr, size) = entry.split_at(self.address_cells as usize);

        Ok(PhysicalRegion::new(
            PhysicalAddress::new(join_cells(addr)),
            join_cells(size),
        ))
    }

    /// Decode entry `index` of `interrupts`.
    ///
    /// # Errors
    /// * [`PropertyError::PropNotFound`] if there is no `interrupts` property,
    /// * [`PropertyError::UnsupportedCellCount`] for a zero or oversized
    ///   `#interrupt-cells`,
    /// * [`PropertyError::InvalidPropFormat`] if the property is ragged,
    /// * [`PropertyError::IndexOutOfRange`] if there are fewer entries.
    pub fn interrupt(&self, index: usize) -> Result<InterruptSpecifier, PropertyError> {
        let prop = self
            .get_property("interrupts")
            .ok_or(PropertyError::PropNotFound)?;
        let width = self.interrupt_cells as usize;
        if width == 0 || width > MAX_INTERRUPT_CELLS {
            return Err(PropertyError::UnsupportedCellCount(self.interrupt_cells));
        }

        let cells: Vec<u32> = prop.value_as_cells()?.collect();
        if cells.len() % width != 0 {
            return Err(PropertyError::InvalidPropFormat);
        }
        let entry = cells
            .chunks_exact(width)
            .nth(index)
            .ok_or(PropertyError::IndexOutOfRange(index))?;
        InterruptSpecifier::new(entry).ok_or(PropertyError::InvalidPropFormat)
    }

    fn reg_width(&self) -> Result<usize, PropertyError> {
        if !(1..=2).contains(&self.address_cells) {
            return Err(PropertyError::UnsupportedCellCount(self.address_cells));
        }
        if self.size_cells > 2 {
            return Err(PropertyError::UnsupportedCellCount(self.size_cells));
        }
        Ok((self.address_cells + self.size_cells) as usize)
    }
}

/// Concatenate up to two big-endian cells into one value.
fn join_cells(cells: &[u32]) -> u64 {
    cells
        .iter()
        .fold(0, |acc, &c| (acc << 32) | u64::from(c))
}
