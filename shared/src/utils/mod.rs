//! Common utility functions

pub mod code;
pub mod email;

pub use code::*;
pub use email::*;
