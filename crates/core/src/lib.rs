#![forbid(unsafe_code)]

pub mod countdown;
pub mod model;
pub mod navigation;
pub mod scoring;
pub mod time;

pub use time::Clock;
