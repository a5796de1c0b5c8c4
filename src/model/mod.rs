pub mod conversion;
pub mod integration;
pub mod path;
pub mod step;

pub use conversion::*;
pub use integration::*;
pub use path::*;
pub use step::*;
