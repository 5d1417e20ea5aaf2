//! Easel Core - single-image editing session engine
//!
//! This crate provides the editing model behind the Easel editor: input
//! validation and decoding, a pixel surface with linear undo/redo history,
//! rotate/flip/zoom view transforms, interactive crop, pending text and
//! shape overlays, freehand drawing, resizing and PNG/JPEG/SVG export.
//!
//! Everything is driven through [`ImageSession`]. Host bindings (see the
//! `easel-wasm` crate) own the session and forward UI events to it.

pub mod color;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod history;
pub mod overlay;
pub mod raster;
pub mod session;
pub mod transform;

pub use color::Color;
pub use config::EditorConfig;
pub use decode::ImageSource;
pub use encode::{ExportFormat, ExportOptions, ExportedImage};
pub use error::EditorError;
pub use geometry::{CropRect, Point};
pub use overlay::{FontHandle, Overlay, OverlayShape, ShapeKind, StrokeStyle, TextStyle};
pub use raster::{PixelSurface, Raster, Surface};
pub use session::{CropHandle, ImageSession, LoadOutcome, LoadTicket, SessionState, Tool};
pub use transform::{FlipAxis, ViewTransform};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_edit_and_export() {
        let mut session = ImageSession::<PixelSurface>::new(EditorConfig::default());
        session.attach_surface(PixelSurface::default());

        let png = encode::encode_png(&Raster::filled(40, 20, [10, 20, 30, 255])).unwrap();
        let source = ImageSource::from_bytes(png).with_mime_type("image/png");
        assert_eq!(
            session.load_image(source).unwrap(),
            LoadOutcome::Loaded {
                width: 40,
                height: 20
            }
        );

        session.rotate_image(90).unwrap();
        session.crop_image(CropRect::new(0.0, 0.0, 20.0, 30.0)).unwrap();
        let exported = session.export_as(ExportFormat::Jpeg).unwrap();

        assert_eq!(exported.file_name, "image-editor-export.jpeg");
        assert_eq!((exported.width, exported.height), (20, 30));
        assert_eq!(&exported.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_state_reflects_session() {
        let mut session = ImageSession::<PixelSurface>::default();
        let state = session.state();
        assert!(!state.surface_ready);
        assert!(!state.has_image);

        session.attach_surface(PixelSurface::default());
        session.load_raster(Raster::filled(8, 8, [0, 0, 0, 255])).unwrap();
        session.select_tool(Tool::Crop);

        let state = session.state();
        assert!(state.has_image);
        assert_eq!(state.tool, Tool::Crop);
        assert_eq!((state.width, state.height), (8, 8));
        assert!(!state.can_undo);
    }
}
