//! Geometric transforms: the view transform composer, crop and resize.
//!
//! # Recompute, don't accumulate
//!
//! Rotation and flips are never applied to an already-transformed raster.
//! The session keeps the source raster it last committed and re-renders it
//! through the whole [`ViewTransform`] every time the transform changes, so
//! repeated rotate/flip calls never compound resampling error.
//!
//! # Coordinate System
//!
//! - Rotation angles are in whole degrees, positive = clockwise on screen
//! - Crop coordinates are canvas pixels of the current surface
//! - Origin is top-left corner, y axis points down

mod affine;
mod crop;
mod render;
mod resize;
mod view;

pub use affine::Affine;
pub use crop::crop_raster;
pub use render::{render_affine, render_view, InterpolationFilter};
pub use resize::{resize_raster, FilterType};
pub use view::{FlipAxis, ViewTransform, MAX_ZOOM, MIN_ZOOM};
