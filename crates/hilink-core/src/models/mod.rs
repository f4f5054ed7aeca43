//! Record shapes returned by the vendor SDK

mod machine;
mod program;
mod telemetry;
mod tool;

pub use machine::*;
pub use program::*;
pub use telemetry::*;
pub use tool::*;
