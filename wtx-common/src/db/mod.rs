//! Document store access

pub mod details;
pub mod init;

pub use details::*;
pub use init::*;
