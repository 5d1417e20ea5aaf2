//! SVG export.
//!
//! The raster is not vectorized. The document is a single `<image>` element
//! whose `href` is a base64 PNG data URL, sized to the canvas.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::png::encode_png;
use super::EncodeError;
use crate::raster::Raster;

/// Encode a raster as an SVG document wrapping an embedded PNG.
pub fn encode_svg(raster: &Raster) -> Result<Vec<u8>, EncodeError> {
    let png = encode_png(raster)?;
    let (width, height) = raster.dimensions();

    let document = format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<svg xmlns=\"http://www.w3.org/2000/svg\" ",
            "xmlns:xlink=\"http://www.w3.org/1999/xlink\" ",
            "width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            "  <image width=\"{w}\" height=\"{h}\" ",
            "href=\"data:image/png;base64,{data}\" ",
            "xlink:href=\"data:image/png;base64,{data}\"/>\n",
            "</svg>\n"
        ),
        w = width,
        h = height,
        data = STANDARD.encode(png),
    );

    Ok(document.into_bytes())
}
