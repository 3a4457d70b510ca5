//! Terminal tetris client (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `tetris_client::{input,session,term,types,ui}`.

pub use tetris_client_input as input;
pub use tetris_client_session as session;
pub use tetris_client_term as term;
pub use tetris_client_types as types;
pub use tetris_client_ui as ui;
