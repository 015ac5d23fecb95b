//! # ACPI device identification
//!
//! ACPI IDs are short ASCII strings (`PNP0A08`, `ACPI0007`, or vendor strings
//! such as `VM_GEN_COUNTER`). Firmware in the wild is inconsistent about their
//! case, so comparisons here are ASCII case-insensitive.

use crate::AcpiDevice;

/// Whether two ACPI IDs denote the same identifier.
#[must_use]
pub fn id_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Match `device` against a driver's static ID table.
///
/// The `_HID` is tried first, then every `_CID` in firmware order. Returns
/// the table entry that matched.
#[must_use]
pub fn match_device(
    table: &'static [&'static str],
    device: &dyn AcpiDevice,
) -> Option<&'static str> {
    let hid = device.hardware_id();
    if let Some(id) = table.iter().find(|id| id_eq(id, hid)) {
        return Some(*id);
    }

    device
        .compatible_ids()
        .iter()
        .find_map(|cid| table.iter().find(|id| id_eq(id, cid)))
        .copied()
}
