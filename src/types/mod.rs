pub mod fix;
pub mod report;

pub use fix::*;
pub use report::*;
