//! # Access-Gated File Directory
//!
//! Maps uploaded object names to randomly generated numeric access codes and
//! answers "which files match this code".

pub mod code;
pub mod registry;

pub use code::{AccessCode, ACCESS_CODE_LEN};
pub use registry::Directory;
