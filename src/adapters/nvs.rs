//! NVS (Non-Volatile Storage) configuration adapter.
//!
//! Implements [`ConfigPort`]: the provisioned [`AgentConfig`] lives in one
//! `postcard`-encoded blob, written during manufacturing or bench setup
//! and read exactly once at boot. There is no runtime write path.
//!
//! The simulation backend keeps the blob in memory so host tests can seed
//! and load a config without flash.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::AgentConfig;

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "buttonlink";
const CONFIG_KEY: &str = "agentcfg";

#[allow(dead_code)]
const MAX_BLOB_SIZE: usize = 1024;

pub struct NvsConfigStore {
    #[cfg(not(target_os = "espidf"))]
    blob: RefCell<Option<Vec<u8>>>,
}

impl NvsConfigStore {
    /// Create the store and initialise NVS flash.
    ///
    /// Returns `Err(ConfigError::IoError)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsConfigStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsConfigStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            blob: RefCell::new(None),
        })
    }

    /// Simulation: seed the stored blob for a host test.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_seed(&self, config: &AgentConfig) {
        let bytes = postcard::to_allocvec(config).expect("config blob encoding");
        *self.blob.borrow_mut() = Some(bytes);
    }

    /// Simulation: seed raw (possibly corrupt) bytes.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_seed_raw(&self, bytes: &[u8]) {
        *self.blob.borrow_mut() = Some(bytes.to_vec());
    }

    /// Open the config namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = CONFIG_NAMESPACE.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let ret = unsafe {
            nvs_open(
                ns_buf.as_ptr() as *const _,
                nvs_open_mode_t_NVS_READONLY,
                &mut handle,
            )
        };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_blob() -> Result<Vec<u8>, i32> {
        Self::with_nvs_handle(|handle| {
            let key_cstr = b"agentcfg\0";
            let mut size: usize = 0;

            // First call: get size
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key_cstr.as_ptr() as *const _,
                    core::ptr::null_mut(),
                    &mut size,
                )
            };
            if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                return Err(ret);
            }

            let mut buf = vec![0u8; size];
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key_cstr.as_ptr() as *const _,
                    buf.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(buf)
        })
    }
}

impl ConfigPort for NvsConfigStore {
    fn load(&self) -> Result<AgentConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            match self.blob.borrow().as_deref() {
                Some(bytes) => {
                    let cfg: AgentConfig =
                        postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                    info!("NvsConfigStore: loaded config ({} bytes)", bytes.len());
                    Ok(cfg)
                }
                None => Err(ConfigError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            match Self::read_blob() {
                Ok(bytes) => {
                    let cfg: AgentConfig =
                        postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                    info!("NvsConfigStore: loaded config from NVS ({} bytes)", bytes.len());
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Err(ConfigError::NotFound),
                Err(e) => {
                    warn!("NvsConfigStore: NVS read error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_blob_reports_not_found() {
        let store = NvsConfigStore::new().unwrap();
        assert!(matches!(store.load(), Err(ConfigError::NotFound)));
    }

    #[test]
    fn seeded_blob_round_trips() {
        let store = NvsConfigStore::new().unwrap();
        let cfg = AgentConfig {
            debounce_window_ms: 75,
            ..Default::default()
        };
        store.sim_seed(&cfg);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.debounce_window_ms, 75);
        assert_eq!(loaded.topic, cfg.topic);
    }

    #[test]
    fn corrupt_blob_reports_corrupted() {
        let store = NvsConfigStore::new().unwrap();
        store.sim_seed_raw(&[0xFF, 0x00, 0xFF]);
        assert!(matches!(store.load(), Err(ConfigError::Corrupted)));
    }
}
