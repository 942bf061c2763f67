//! Chip and firmware information for ESP32.

use esp_idf_svc::sys;
use knoblomat_core::info::{chip_id, SystemInfo};
use std::ffi::CStr;

/// Read the current system state.
///
/// `software` is the firmware version string reported as `Software`. The
/// sketch fields (size, free space, MD5) are not reported by ESP-IDF builds
/// and stay at their defaults.
pub fn read_system_info(software: &str) -> SystemInfo {
    let mut chip = sys::esp_chip_info_t::default();
    let mut mac = [0u8; 6];
    let mut flash_size: u32 = 0;

    // SAFETY: all out-pointers reference live locals of the right size
    let (mac_ok, flash_ok) = unsafe {
        sys::esp_chip_info(&mut chip);
        (
            sys::esp_efuse_mac_get_default(mac.as_mut_ptr()) == sys::ESP_OK as sys::esp_err_t,
            sys::esp_flash_get_size(std::ptr::null_mut(), &mut flash_size) == sys::ESP_OK as sys::esp_err_t,
        )
    };
    if !mac_ok {
        log::warn!("Could not read eFuse MAC");
    }
    if !flash_ok {
        log::warn!("Could not read flash size");
    }

    // SAFETY: esp_get_idf_version returns a static NUL-terminated string
    let sdk_version = unsafe { CStr::from_ptr(sys::esp_get_idf_version()) }
        .to_string_lossy()
        .into_owned();

    let efuse_mac = mac.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

    SystemInfo {
        chip_revision: u32::from(chip.revision),
        cpu_freq_mhz: unsafe { sys::esp_rom_get_cpu_ticks_per_us() },
        flash_chip_size: flash_size / 1000,
        heap_size: (unsafe { sys::heap_caps_get_total_size(sys::MALLOC_CAP_DEFAULT) } / 1000) as u32,
        free_heap: unsafe { sys::esp_get_free_heap_size() } / 1000,
        sdk_version,
        chip_id: chip_id(efuse_mac),
        software: software.to_string(),
        ..Default::default()
    }
}
