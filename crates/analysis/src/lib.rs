pub mod centroid;
pub mod display;
pub mod precision;
pub mod properties;
pub mod summary;

pub use centroid::*;
pub use display::*;
pub use precision::*;
pub use properties::*;
pub use summary::*;
