//! High level hidapi abstraction for interacting with six key macro decks.
//!
//! This crate provides reverse-engineered bindings to drive stream deck
//! style macro pads with six keys, a tiny color display behind each key and
//! a global backlight brightness.
//!
//! ## Protocol Overview
//!
//! - Key icons: 80x80 24-bit BMP rasters split across 1024-byte interrupt
//!   reports, one page 1 packet plus 19 page 2 packets per key (see [`abi`])
//! - Brightness: 17-byte feature report
//! - Key presses: 8-byte input reports, decoded into edge triggered
//!   [`DeckEvent`]s

use std::ffi::CStr;
use std::sync::{LazyLock, RwLock};

use hidapi::{HidApi, HidDevice};

pub mod abi;
pub mod events;
pub mod raster;
pub mod types;

pub use events::DeckEvent;
pub use types::{MinideckError, MinideckResult};

pub mod consts {
    /// USB vendor id
    pub const VENDOR_ID: u16 = 0x0FD9;
    /// USB product id
    pub const PRODUCT_ID: u16 = 0x0063;
    /// Number of physical keys
    pub const NUM_KEYS: usize = 6;
    /// Source icon edge length in pixels
    pub const IMAGE_SIZE: usize = 72;
    /// On-device icon canvas edge length in pixels
    pub const ICON_SIZE: usize = 80;
    /// Raw source buffer size (72x72 interleaved rgb)
    pub const IMAGE_BYTES: usize = IMAGE_SIZE * IMAGE_SIZE * 3;
    /// Device pixel stream size (80x80 interleaved bgr)
    pub const ICON_BYTES: usize = ICON_SIZE * ICON_SIZE * 3;
}

/// Lazy handle to hidapi
static API: LazyLock<RwLock<HidApi>> =
    LazyLock::new(|| RwLock::new(HidApi::new().expect("failed to init hidapi")));

fn check_key(key: u8) -> MinideckResult<()> {
    if key as usize >= consts::NUM_KEYS {
        return Err(MinideckError::InvalidKeyIndex(key));
    }
    Ok(())
}

fn check_brightness(percent: u8) -> MinideckResult<()> {
    if percent > 100 {
        return Err(MinideckError::InvalidBrightness(percent));
    }
    Ok(())
}

/// High level abstraction for managing a six key deck
pub struct Minideck {
    pub device: HidDevice,
    keys: [bool; consts::NUM_KEYS],
    buf: [u8; 64],
}

impl Minideck {
    /// Find and open the first matching device
    pub fn open() -> MinideckResult<Self> {
        API.write().unwrap().refresh_devices()?;
        let api = API.read().unwrap();
        let device = api
            .device_list()
            .find(|d| {
                d.vendor_id() == consts::VENDOR_ID && d.product_id() == consts::PRODUCT_ID
            })
            .ok_or(MinideckError::DeviceNotFound)?
            .open_device(&api)?;
        Ok(Self::from_device(device))
    }

    /// Open a specific device path, bypassing detection
    pub fn open_path(path: &CStr) -> MinideckResult<Self> {
        let device = API.read().unwrap().open_path(path)?;
        Ok(Self::from_device(device))
    }

    fn from_device(device: HidDevice) -> Self {
        Self {
            device,
            keys: [false; consts::NUM_KEYS],
            buf: [0u8; 64],
        }
    }

    /// Fill a key with a solid color
    pub fn fill_color(&mut self, key: u8, r: u8, g: u8, b: u8) -> MinideckResult<()> {
        check_key(key)?;
        self.write_key_image(key, &raster::solid_pixels(r, g, b))
    }

    /// Render a raw 72x72 rgb image onto a key.
    ///
    /// The buffer must be exactly [`consts::IMAGE_BYTES`] long; decoding and
    /// resizing image files is the caller's job.
    pub fn fill_image(&mut self, key: u8, rgb: &[u8]) -> MinideckResult<()> {
        check_key(key)?;
        let stream = raster::key_pixels(rgb)?;
        self.write_key_image(key, &stream)
    }

    /// Clear a key back to black
    pub fn clear_key(&mut self, key: u8) -> MinideckResult<()> {
        self.fill_color(key, 0, 0, 0)
    }

    /// Clear every key back to black, in ascending order. Aborts on the
    /// first failed write.
    pub fn clear_all_keys(&mut self) -> MinideckResult<()> {
        for key in 0..consts::NUM_KEYS as u8 {
            self.clear_key(key)?;
        }
        Ok(())
    }

    /// Set the global key backlight brightness, as a percentage
    pub fn set_brightness(&mut self, percent: u8) -> MinideckResult<()> {
        check_brightness(percent)?;
        self.send_feature_report(&abi::brightness_report(percent))
    }

    /// Send a raw interrupt report to the device
    pub fn write(&mut self, buf: &[u8]) -> MinideckResult<()> {
        self.device.write(buf)?;
        Ok(())
    }

    /// Send a raw feature report to the device
    pub fn send_feature_report(&mut self, buf: &[u8]) -> MinideckResult<()> {
        self.device.send_feature_report(buf)?;
        Ok(())
    }

    /// Poll for key events, blocking up to `timeout_ms` (or forever with a
    /// negative timeout) for one input report.
    ///
    /// Returns an empty vec when the timeout expires or the report repeats
    /// the current key state. Key state is tracked per session, so deliveries
    /// must not be interleaved across threads.
    pub fn read_events(&mut self, timeout_ms: i32) -> MinideckResult<Vec<DeckEvent>> {
        let len = self.device.read_timeout(&mut self.buf, timeout_ms)?;
        if len == 0 {
            return Ok(Vec::new());
        }
        Ok(events::decode_report(&mut self.keys, &self.buf[..len]))
    }

    fn write_key_image(&mut self, key: u8, stream: &[u8; consts::ICON_BYTES]) -> MinideckResult<()> {
        for packet in abi::key_packets(key, stream) {
            self.write(&packet)?;
        }
        Ok(())
    }
}
