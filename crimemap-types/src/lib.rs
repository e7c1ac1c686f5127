//! Geographic primitives used by the incident map crates.
//!
//! * [`geo`] holds latitude/longitude points and bounding boxes.
//! * [`cartesian`] holds pixel-space points and sizes.
//! * [`mercator`] converts between the two with the Web Mercator projection used by slippy
//!   map tiles.

pub mod cartesian;
pub mod geo;
pub mod mercator;

pub use cartesian::{Point2, Size};
pub use geo::{GeoBbox, GeoPoint};
