pub mod color;
pub mod duration;
pub mod error;
pub mod habitable;
pub mod orbit;
pub mod packing;

pub use error::{CelestialError, CelestialResult};

/// One astronomical unit expressed in Earth diameters, so that the Earth can
/// be drawn with a diameter of exactly 1.
pub const ASTRONOMICAL_UNIT: f64 = 11727.647;
