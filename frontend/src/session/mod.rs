//! Streaming session core.
//!
//! Split the way the workflow is split: `state` is the renderable record,
//! `controller` is the phase machine that owns it, and `channel` is the
//! transport wrapper the controller's effects open and close.

mod channel;
mod controller;
mod state;

pub use channel::StreamChannel;
pub use controller::{ChannelId, Effect, SessionController, StreamEvent, StreamRequest};
pub use state::{SessionPhase, SessionState, TokenStream};
