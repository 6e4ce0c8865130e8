//! # Connection Arena
//!
//! Per-connection movement history, owned by the connection it belongs to.
//!
//! [`ConnectionTable`] hands out never-reused [`ConnectionId`]s and keeps one
//! [`ConnectionSlot`] per open connection. Closing a connection drops its slot
//! and with it the whole [`ConnectionMovementState`]; nothing is keyed by
//! player name and nothing outlives the connection.
//!
//! [`ConnectionWorker`] drives one connection: it drains inbound frames in
//! arrival order, runs each through the [`Dispatcher`], and stops at the first
//! decode error or validator termination. Different connections run on
//! independent workers and never share a lock.

use crate::error::{constants, DecodeError, ProtocolError, Result};
use crate::protocol::dispatcher::{DispatchOutcome, Dispatcher};
use crate::protocol::handler::{CloseCode, ConnectionControl, PacketHandler};
use crate::protocol::validator::{ConnectionMovementState, TerminationReason};
use crate::utils::metrics::{global_metrics, Metrics};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, error, instrument, warn};

/// Opaque handle for one open connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// State owned by one open connection.
#[derive(Debug)]
pub struct ConnectionSlot {
    id: ConnectionId,
    movement: Mutex<ConnectionMovementState>,
}

impl ConnectionSlot {
    fn new(id: ConnectionId) -> Self {
        Self {
            id,
            movement: Mutex::new(ConnectionMovementState::new()),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Run `f` with exclusive access to this connection's movement state.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut ConnectionMovementState) -> R) -> Result<R> {
        let mut state = self
            .movement
            .lock()
            .map_err(|_| ProtocolError::Custom(constants::ERR_STATE_LOCK.to_string()))?;
        Ok(f(&mut state))
    }
}

/// Arena of open connections.
#[derive(Debug)]
pub struct ConnectionTable {
    next_id: AtomicU64,
    slots: RwLock<HashMap<ConnectionId, Arc<ConnectionSlot>>>,
    metrics: Arc<Metrics>,
}

impl Default for ConnectionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::with_metrics(global_metrics())
    }

    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            slots: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    /// Register a new connection with empty movement history.
    pub fn open(&self) -> Result<ConnectionId> {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut slots = self
            .slots
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_TABLE_WRITE_LOCK.to_string()))?;
        slots.insert(id, Arc::new(ConnectionSlot::new(id)));
        drop(slots);

        self.metrics.connection_opened();
        debug!(connection = %id, "Connection opened");
        Ok(id)
    }

    pub fn get(&self, id: ConnectionId) -> Result<Arc<ConnectionSlot>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| ProtocolError::Custom(constants::ERR_TABLE_READ_LOCK.to_string()))?;
        slots
            .get(&id)
            .cloned()
            .ok_or(ProtocolError::UnknownConnection(id))
    }

    /// Drop a connection and its movement state. Returns whether it was open.
    pub fn close(&self, id: ConnectionId) -> Result<bool> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| ProtocolError::Custom(constants::ERR_TABLE_WRITE_LOCK.to_string()))?;
        let removed = slots.remove(&id).is_some();
        drop(slots);

        if removed {
            self.metrics.connection_closed();
            debug!(connection = %id, "Connection closed");
        }
        Ok(removed)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(&id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against the movement state of connection `id`.
    pub fn with_state<R>(
        &self,
        id: ConnectionId,
        f: impl FnOnce(&mut ConnectionMovementState) -> R,
    ) -> Result<R> {
        self.get(id)?.with_state(f)
    }
}

/// One inbound packet frame: identifier plus raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: u32,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(id: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }
}

/// Why a worker stopped.
#[derive(Debug)]
pub enum WorkerExit {
    /// The sender side hung up; every frame was processed.
    Drained,
    /// The validator closed the connection.
    Terminated(TerminationReason),
    /// A frame failed to decode; the connection was closed.
    ProtocolViolation(DecodeError),
    /// Internal failure (poisoned state lock); the connection was closed.
    Failed(ProtocolError),
}

/// Removes the slot however the worker ends.
struct SlotGuard {
    table: Arc<ConnectionTable>,
    id: ConnectionId,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if let Err(e) = self.table.close(self.id) {
            error!(connection = %self.id, error = %e, "Failed to release connection slot");
        }
    }
}

/// Sequential packet pipeline for one connection.
///
/// The connection's slot is released when the worker is dropped, whether or
/// not [`run`](ConnectionWorker::run) was ever polled.
pub struct ConnectionWorker<S> {
    id: ConnectionId,
    guard: SlotGuard,
    dispatcher: Arc<Dispatcher>,
    session: S,
    frames: mpsc::Receiver<Frame>,
}

impl<S> ConnectionWorker<S>
where
    S: PacketHandler + ConnectionControl + Send,
{
    /// Open a connection in `table` and build its worker.
    ///
    /// Frames pushed into the returned sender are processed in order.
    pub fn new(
        table: Arc<ConnectionTable>,
        dispatcher: Arc<Dispatcher>,
        session: S,
        capacity: usize,
    ) -> Result<(Self, mpsc::Sender<Frame>)> {
        let id = table.open()?;
        let guard = SlotGuard { table, id };
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Ok((
            Self {
                id,
                guard,
                dispatcher,
                session,
                frames: rx,
            },
            tx,
        ))
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Process frames until the channel closes or the connection is closed.
    ///
    /// Returns the session so the caller can inspect what it saw.
    #[instrument(skip(self), fields(connection = %self.id))]
    pub async fn run(self) -> (S, WorkerExit) {
        let ConnectionWorker {
            id,
            guard,
            dispatcher,
            mut session,
            mut frames,
        } = self;

        let slot = match guard.table.get(id) {
            Ok(slot) => slot,
            Err(e) => {
                session.close(CloseCode::Kicked, &e.to_string());
                return (session, WorkerExit::Failed(e));
            }
        };

        while let Some(frame) = frames.recv().await {
            let result = slot
                .with_state(|state| {
                    dispatcher.decode_and_dispatch(frame.id, &frame.payload, state, &mut session)
                })
                .and_then(|outcome| outcome);

            match result {
                Ok(DispatchOutcome::Handled { .. }) => {}
                Ok(DispatchOutcome::Terminated(reason)) => {
                    // the dispatcher already closed the session
                    return (session, WorkerExit::Terminated(reason));
                }
                Err(ProtocolError::Decode(e)) => {
                    warn!(packet_id = frame.id, error = %e, "Malformed packet, closing connection");
                    session.close(
                        CloseCode::ProtocolViolation,
                        constants::REASON_PROTOCOL_VIOLATION,
                    );
                    return (session, WorkerExit::ProtocolViolation(e));
                }
                Err(e) => {
                    error!(error = %e, "Connection worker failed");
                    session.close(CloseCode::Kicked, &e.to_string());
                    return (session, WorkerExit::Failed(e));
                }
            }
        }

        (session, WorkerExit::Drained)
    }
}
