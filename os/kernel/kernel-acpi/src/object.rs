use crate::AcpiError;
use alloc::boxed::Box;
use alloc::vec::Vec;
use kernel_memory_addresses::PhysicalAddress;

/// The value of an evaluated ACPI object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcpiObject {
    Integer(u64),
    String(Box<str>),
    Buffer(Box<[u8]>),
    Package(Vec<AcpiObject>),
}

impl AcpiObject {
    /// The ACPI type name, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::String(_) => "String",
            Self::Buffer(_) => "Buffer",
            Self::Package(_) => "Package",
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Interpret the object as a 32-bit integer (a `DWord` in AML terms).
    ///
    /// # Errors
    /// [`AcpiError::UnexpectedType`] for non-integers,
    /// [`AcpiError::IntegerOverflow`] if the value is wider than 32 bits.
    pub fn as_dword(&self) -> Result<u32, AcpiError> {
        let v = self.as_integer().ok_or(AcpiError::UnexpectedType {
            expected: "Integer",
            found: self.type_name(),
        })?;
        u32::try_from(v).map_err(|_| AcpiError::IntegerOverflow(v))
    }
}

/// Decode a 64-bit physical address returned by firmware.
///
/// Two encodings are accepted:
///
/// * a `Package` of exactly two integers, `{ low, high }`, each holding
///   32 bits (the form VM generation counters and similar vendor methods
///   use), and
/// * an 8-byte `Buffer` holding the address little-endian.
///
/// # Errors
/// Any structural mismatch is reported as the matching [`AcpiError`];
/// an address of zero is [`AcpiError::NullAddress`].
pub fn decode_address(obj: &AcpiObject) -> Result<PhysicalAddress, AcpiError> {
    let pa = match obj {
        AcpiObject::Package(elements) => {
            let [low, high] = elements.as_slice() else {
                return Err(AcpiError::PackageLength {
                    found: elements.len(),
                    expected: 2,
                });
            };
            PhysicalAddress::from_words(low.as_dword()?, high.as_dword()?)
        }
        AcpiObject::Buffer(bytes) => {
            let raw = <[u8; 8]>::try_from(&bytes[..]).map_err(|_| AcpiError::BufferLength {
                found: bytes.len(),
                expected: 8,
            })?;
            PhysicalAddress::new(u64::from_le_bytes(raw))
        }
        other => {
            return Err(AcpiError::UnexpectedType {
                expected: "Package",
                found: other.type_name(),
            });
        }
    };

    if pa.is_null() {
        return Err(AcpiError::NullAddress);
    }
    Ok(pa)
}
