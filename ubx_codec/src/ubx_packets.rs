//! Message catalog: one module per message family.
//!
//! Every type wraps its owned payload and reads fields through the
//! descriptors of [`crate::field`]. Command types are created through their
//! `*Builder`, which validates parameters before laying out the payload.

pub mod packets;
mod types;

pub use packets::*;
pub use types::{Position, Velocity};
