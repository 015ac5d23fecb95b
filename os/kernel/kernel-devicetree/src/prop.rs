use alloc::boxed::Box;
use alloc::vec::Vec;
use core::str;

/// A raw device-tree property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: Box<str>,
    pub data: Box<[u8]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("property has an invalid format")]
    InvalidPropFormat,
    #[error("property not found")]
    PropNotFound,
    #[error("index {0} is out of range")]
    IndexOutOfRange(usize),
    #[error("cell count {0} is not supported")]
    UnsupportedCellCount(u32),
}

impl Property {
    #[must_use]
    pub fn new(name: &str, data: &[u8]) -> Self {
        Self {
            name: Box::from(name),
            data: Box::from(data),
        }
    }

    /// A property holding big-endian 32-bit cells.
    #[must_use]
    pub fn from_cells(name: &str, cells: &[u32]) -> Self {
        let data: Vec<u8> = cells.iter().flat_map(|c| c.to_be_bytes()).collect();
        Self {
            name: Box::from(name),
            data: data.into_boxed_slice(),
        }
    }

    /// A property holding a NUL-separated string list.
    #[must_use]
    pub fn from_strs(name: &str, values: &[&str]) -> Self {
        let mut data = Vec::new();
        for v in values {
            data.extend_from_slice(v.as_bytes());
            data.push(0);
        }
        Self {
            name: Box::from(name),
            data: data.into_boxed_slice(),
        }
    }

    /// Interpret the first cell as a big-endian `u32`.
    ///
    /// # Errors
    /// [`PropertyError::InvalidPropFormat`] if the property is shorter than
    /// one cell.
    pub fn value_as_u32(&self) -> Result<u32, PropertyError> {
        self.data
            .first_chunk::<4>()
            .map(|c| u32::from_be_bytes(*c))
            .ok_or(PropertyError::InvalidPropFormat)
    }

    /// Interpret the property as a NUL-terminated string.
    ///
    /// # Errors
    /// [`PropertyError::InvalidPropFormat`] if it is not valid UTF-8.
    pub fn value_as_str(&self) -> Result<&str, PropertyError> {
        str::from_utf8(&self.data)
            .map(|s| s.trim_end_matches('\0'))
            .map_err(|_| PropertyError::InvalidPropFormat)
    }

    /// Iterate the entries of a NUL-separated string list.
    ///
    /// Entries that are not valid UTF-8 are skipped.
    pub fn value_as_strlist(&self) -> impl Iterator<Item = &str> {
        let data = self.data.strip_suffix(&[0]).unwrap_or(&self.data[..]);
        data.split(|b| *b == 0)
            .filter(|s| !s.is_empty())
            .filter_map(|s| str::from_utf8(s).ok())
    }

    /// Iterate the property as big-endian 32-bit cells.
    ///
    /// # Errors
    /// [`PropertyError::InvalidPropFormat`] if the length is not a multiple
    /// of four bytes.
    pub fn value_as_cells(&self) -> Result<impl Iterator<Item = u32> + '_, PropertyError> {
        if self.data.len() % 4 != 0 {
            return Err(PropertyError::InvalidPropFormat);
        }
        Ok(self
            .data
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
    }

    /// Number of 32-bit cells in the property.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.data.len() / 4
    }
}
