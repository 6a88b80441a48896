pub mod cache;
pub mod client;
pub mod clock;
pub(crate) mod config;
pub mod delta;
pub mod error;
pub mod lock;
pub mod predict;
pub mod rank;
pub mod response;
pub mod settings;
pub mod storage;
pub mod types;

pub use delta::{Decision, Deltas, Predictor};
pub use error::{Error, Result};
