//! Types shared between the Serpent kernel and its support crates.

#![no_std]

pub mod error;
pub mod gate;

pub use error::{InputError, IrqError};
pub use gate::GateFlags;
