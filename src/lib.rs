// Control layer for a retro-styled embedded video player.
// The host page supplies the media element and UI through the traits in
// `platform`; `player::PlayerSession` drives them.

pub mod config;
pub mod constants;
pub mod platform;
pub mod player;
pub mod runtime;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use player::{PlayerSession, SessionEvent, SessionPorts};
pub use runtime::{SessionDriver, TokioScheduler, session_channel};
