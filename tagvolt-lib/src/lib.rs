pub mod command;
pub mod constants;
pub mod error;
pub mod event;
pub mod gain;
pub mod response;
pub mod sequencer;
pub mod transport;
pub mod voltage;

// Re-export the main entry points for easy access
pub use sequencer::{RunConfig, Sequencer};
pub use transport::TagTransport;
