pub mod price_curve;
pub mod quadkey;

pub use price_curve::*;
pub use quadkey::*;
