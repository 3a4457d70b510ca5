//! Session module - the client's view of a remote game session
//!
//! A session is a pair of one-directional channels plus the player's display
//! name:
//!
//! - **inbound**: ordered stream of [`BoardSnapshot`](crate::types::BoardSnapshot)s
//! - **outbound**: sink of [`MoveCommand`](crate::types::MoveCommand)s
//!
//! [`SessionHandle`] is the side the UI consumes; [`SessionPeer`] is the side
//! the session collaborator (network client, replay, or test) drives.
//! [`replay`] provides a local collaborator that plays snapshots from a file.

pub mod handle;
pub mod replay;

pub use tetris_client_types as types;

pub use handle::{SessionHandle, SessionPeer};
pub use replay::{ReplayReport, ReplaySession};
