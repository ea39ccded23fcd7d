//! Domain models for the Tornado Risk Monitor

mod location;
mod risk;
mod weather;

pub use location::*;
pub use risk::*;
pub use weather::*;
