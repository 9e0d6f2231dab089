pub mod dashboard;
pub mod selection;

pub use dashboard::*;
pub use selection::*;
