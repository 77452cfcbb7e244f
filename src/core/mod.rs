//! Pure state machine core for Paxos - no I/O, no async
//!
//! This module contains the state transition logic that is shared between:
//! - The async runtime implementation
//! - The Stateright model checker tests
//!
//! By extracting this logic, we ensure the model checker verifies the exact
//! same state transitions as the production code.
//!
//! # Modules
//!
//! - [`types`]: Core type definitions (`ProposalNumber`, message types)
//! - [`acceptor`]: Acceptor state machine (`AcceptorCore`)
//! - [`proposer`]: Proposer state machine (`ProposerCore`)
//! - [`quorum`]: The strict-majority rule (`is_majority`)

pub(crate) mod acceptor;
pub(crate) mod proposer;
pub(crate) mod quorum;
pub(crate) mod types;

pub use acceptor::AcceptorCore;
pub use proposer::{AcceptPhaseResult, PreparePhaseResult, ProposerCore};
pub use quorum::is_majority;
pub use types::{AcceptResponse, PromiseResponse, Proposal, ProposalNumber, RoundResult};
