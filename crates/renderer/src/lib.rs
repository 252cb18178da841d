//! Contour rendering for travel-time surfaces.
//!
//! Implements:
//! - Contour lines (marching squares) with automatic level selection
//! - Blue-to-red level coloring
//! - KML document output

pub mod contour;
pub mod error;
pub mod gradient;
pub mod kml;

pub use contour::{extract, extract_levels, select_levels, Contour, ContourLevel, ContourSet, Point};
pub use error::{RenderError, Result};
pub use gradient::{color_for, Color, LinearGradient};
pub use kml::{KmlWriter, LevelStyle};
