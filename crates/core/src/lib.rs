#![forbid(unsafe_code)]

pub mod answer;
pub mod daily;
pub mod engine;
pub mod error;
pub mod games;
pub mod model;
pub mod time;

pub use error::{Error, ValidationError};
pub use time::Clock;
