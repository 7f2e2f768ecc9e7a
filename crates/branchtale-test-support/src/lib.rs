//! Shared test mocks and fixtures for the Branchtale adventure engine.

mod channel;
mod clock;
mod fixtures;
mod input;
mod loader;

pub use channel::{ChannelCall, RecordingChannel};
pub use clock::{FixedClock, fixed_now};
pub use fixtures::{PIGS_GAME_ID, pigs_graph, sample_catalog, three_option_graph};
pub use input::ManualInputSource;
pub use loader::StaticGraphLoader;
