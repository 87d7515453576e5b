//! Device identity derived from the factory MAC address.
//!
//! Used as the fallback when the provisioned configuration leaves
//! `device_id` empty. Produces a stable, human-readable ID in the form
//! `bl-xxyyzz` (last 3 bytes of the 6-byte MAC), deterministic across
//! reboots since the MAC is burned into eFuse.

/// Fixed-size device ID string: "bl-xxyyzz".
pub type DeviceIdString = heapless::String<16>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Derive the short device ID from the last 3 MAC bytes.
pub fn device_id(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    use core::fmt::Write;
    let _ = write!(id, "bl-{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    id
}
