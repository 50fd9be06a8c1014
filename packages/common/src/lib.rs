pub mod envelope;
pub mod notice;
pub mod section;

pub use envelope::*;
pub use notice::*;
pub use section::*;
