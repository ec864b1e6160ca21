//! Image tools.

pub mod qr_code;
pub mod svg_placeholder;
pub mod wifi_qr_code;

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgb};
use qrcode::{EcLevel, QrCode};

use crate::domains::tools::error::{ToolError, ToolResult};

pub use qr_code::QrCodeGeneratorTool;
pub use svg_placeholder::SvgPlaceholderGeneratorTool;
pub use wifi_qr_code::WifiQrCodeGeneratorTool;

/// Pixel size of one QR module.
const MODULE_PIXELS: u32 = 20;

/// Content type of every rendered QR code.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Map an error correction level name; unknown names fall back to medium.
fn ec_level(name: &str) -> EcLevel {
    match name.to_lowercase().as_str() {
        "low" => EcLevel::L,
        "quartile" => EcLevel::Q,
        "high" => EcLevel::H,
        _ => EcLevel::M,
    }
}

/// Render `data` as a QR code PNG and return it base64-encoded.
fn render_qr_png(data: &str, level: EcLevel, dark: [u8; 3], light: [u8; 3]) -> ToolResult<String> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), level)
        .map_err(|e| ToolError::invalid_arguments(format!("Cannot encode QR code: {e}")))?;
    let image = code
        .render::<Rgb<u8>>()
        .dark_color(Rgb(dark))
        .light_color(Rgb(light))
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .build();

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ToolError::execution_failed(format!("Failed to encode PNG: {e}")))?;
    Ok(STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_qr_png() {
        let encoded = render_qr_png("hello", EcLevel::M, [0, 0, 0], [255, 255, 255]).unwrap();
        let png = STANDARD.decode(encoded).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_ec_level_names() {
        assert_eq!(ec_level("Low"), EcLevel::L);
        assert_eq!(ec_level("QUARTILE"), EcLevel::Q);
        assert_eq!(ec_level("High"), EcLevel::H);
        assert_eq!(ec_level("whatever"), EcLevel::M);
    }
}
