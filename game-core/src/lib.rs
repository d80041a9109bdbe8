pub mod config;
pub mod controller;
pub mod game_events;
pub mod game_session;
pub mod guess_store;
pub mod oracle;
pub mod pipeline;
pub mod rank_bucket;
pub mod turn_controller;

// Re-export main components
pub use config::*;
pub use controller::*;
pub use game_events::*;
pub use game_session::*;
pub use guess_store::*;
pub use oracle::*;
pub use pipeline::*;
pub use rank_bucket::*;
pub use turn_controller::*;
