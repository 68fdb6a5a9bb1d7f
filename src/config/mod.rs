pub mod defaults;
pub mod paths;
mod settings;

pub use settings::{Job, Settings, Sink, Source};
