//! Type definitions for chargeview

mod error;
pub mod lenient;
mod payload;
mod report;
mod view;

pub use error::*;
pub use payload::*;
pub use report::*;
pub use view::*;
