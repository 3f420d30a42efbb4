pub mod heatmap;
pub mod price;

pub use heatmap::*;
pub use price::*;
