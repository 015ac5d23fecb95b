//! # Device Tree Node Model
//!
//! A device node as handed to a platform driver after the flattened device
//! tree has been unflattened by the kernel: a name plus a list of raw
//! properties, together with the cell sizes inherited from its parent and
//! interrupt parent.
//!
//! ## Property Encoding
//!
//! Device-tree properties are opaque byte strings. The conventions decoded
//! here are:
//!
//! | Property | Encoding |
//! |----------|----------|
//! | `compatible` | NUL-separated string list, most specific first |
//! | `status` | NUL-terminated string; absent or `"okay"` means available |
//! | `reg` | `(address, size)` tuples of big-endian cells; widths from the parent's `#address-cells`/`#size-cells` |
//! | `interrupts` | specifiers of `#interrupt-cells` big-endian cells each |
//!
//! ```rust
//! use kernel_devicetree::{Node, Property};
//!
//! let node = Node::new("vmgenid@bfeff000")
//!     .with_property(Property::from_strs("compatible", &["microsoft,vmgenid"]))
//!     .with_property(Property::from_cells("reg", &[0x0, 0xbfef_f000, 0x10]))
//!     .with_property(Property::from_cells("interrupts", &[0x0, 0x23, 0x1]))
//!     .with_parent_cells(2, 1)
//!     .with_interrupt_cells(3);
//!
//! assert!(node.is_compatible("microsoft,vmgenid"));
//! let reg = node.reg(0).unwrap();
//! assert_eq!(reg.base().as_u64(), 0xbfef_f000);
//! assert_eq!(reg.len(), 0x10);
//! assert_eq!(node.interrupt(0).unwrap().cells(), &[0x0, 0x23, 0x1]);
//! ```
//!
//! ## Interrupt Translation
//!
//! An interrupt specifier only has meaning to the interrupt controller it is
//! addressed to. The kernel resolves it into a global line number through an
//! [`InterruptDomain`].

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod interrupt;
mod node;
mod prop;

pub use interrupt::{InterruptDomain, InterruptSpecifier, MAX_INTERRUPT_CELLS};
pub use node::Node;
pub use prop::{Property, PropertyError};

/// `#address-cells` assumed when the parent does not declare one.
pub const DEFAULT_ADDRESS_CELLS: u32 = 2;

/// `#size-cells` assumed when the parent does not declare one.
pub const DEFAULT_SIZE_CELLS: u32 = 1;

/// `#interrupt-cells` assumed when the interrupt parent does not declare one.
pub const DEFAULT_INTERRUPT_CELLS: u32 = 1;
