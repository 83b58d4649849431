//! Build-time identity of the plugin that owns the presets.
//!
//! Preset files are stamped with the manufacturer and plugin codes so a file
//! written by another product is rejected on load. Codes are the usual
//! four-character codes packed big-endian into a `u32` and written as
//! lowercase hex.

use crate::error::ConfigError;

/// Packs a four-character code big-endian.
///
/// # Example
///
/// ```rust
/// use cadence_config::fourcc;
///
/// assert_eq!(fourcc(b"Cdnc"), 0x43646e63);
/// ```
pub const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

/// Vendor and product the preset files belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginIdentity {
    /// Vendor name, used as a directory segment.
    pub manufacturer: String,
    /// Product name, used as a directory segment.
    pub product: String,
    /// Vendor four-character code.
    pub manufacturer_code: u32,
    /// Product four-character code.
    pub plugin_code: u32,
}

impl PluginIdentity {
    /// Identity from names and packed codes.
    pub fn new(
        manufacturer: impl Into<String>,
        product: impl Into<String>,
        manufacturer_code: u32,
        plugin_code: u32,
    ) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            product: product.into(),
            manufacturer_code,
            plugin_code,
        }
    }

    /// Identity from names and four-character code strings such as `"Cdnc"`.
    pub fn from_codes(
        manufacturer: impl Into<String>,
        product: impl Into<String>,
        manufacturer_code: &str,
        plugin_code: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            manufacturer,
            product,
            parse_code(manufacturer_code)?,
            parse_code(plugin_code)?,
        ))
    }

    /// Manufacturer tag as written in preset documents.
    pub fn manufacturer_tag(&self) -> String {
        format!("{:x}", self.manufacturer_code)
    }

    /// Plugin tag as written in preset documents.
    pub fn plugin_tag(&self) -> String {
        format!("{:x}", self.plugin_code)
    }

    /// Checks the tags read from a document against this identity.
    pub fn verify_tags(&self, manufacturer: &str, plugin: &str) -> Result<(), ConfigError> {
        if manufacturer == self.manufacturer_tag() && plugin == self.plugin_tag() {
            Ok(())
        } else {
            Err(ConfigError::ForeignPreset {
                manufacturer: manufacturer.to_string(),
                plugin: plugin.to_string(),
            })
        }
    }
}

fn parse_code(code: &str) -> Result<u32, ConfigError> {
    let bytes: [u8; 4] = code
        .as_bytes()
        .try_into()
        .map_err(|_| ConfigError::InvalidCode(code.to_string()))?;
    if !bytes.iter().all(u8::is_ascii_graphic) {
        return Err(ConfigError::InvalidCode(code.to_string()));
    }
    Ok(fourcc(&bytes))
}
