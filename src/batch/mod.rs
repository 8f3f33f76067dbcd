pub mod hint;
pub mod input;
pub mod lenient;
pub mod runner;

pub use input::BatchSpec;
pub use runner::{BatchOptions, ChannelIdMode, Ingestor};
