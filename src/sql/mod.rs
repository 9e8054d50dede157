//! Safe SQL builder: identifiers from the validated catalog only, values as parameters.

mod builder;
pub use builder::*;
