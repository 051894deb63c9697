#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::Clock;
