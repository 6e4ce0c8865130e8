//! # Protocol Pipeline
//!
//! Everything between a raw inbound payload and game logic.
//!
//! - [`dispatcher`]: identifier → codec registry and the
//!   decode → validate → handle sequence
//! - [`validator`]: movement and input rules with per-connection history
//! - [`connection`]: connection arena and the per-connection worker
//! - [`handler`]: capabilities consumed from the session layer

pub mod connection;
pub mod dispatcher;
pub mod handler;
pub mod validator;

pub use connection::{ConnectionId, ConnectionTable, ConnectionWorker, Frame, WorkerExit};
pub use dispatcher::{decode_packet, DispatchOutcome, Dispatcher, PacketRegistry};
pub use handler::{CloseCode, ConnectionControl, PacketHandler};
pub use validator::{ConnectionMovementState, MovementValidator, TerminationReason, Verdict};
