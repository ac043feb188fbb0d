//! Session management.
//!
//! - [`SessionManager`]: sign-in / sign-up / sign-out and auth state
//! - [`SessionEventBus`]: publishes [`SessionEvent`]s to UI observers

mod events;
mod manager;

pub use events::{SessionEvent, SessionEventBus};
pub use manager::SessionManager;
