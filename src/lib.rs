//! Single-decree Paxos consensus library
//!
//! This library decides exactly one value among a set of acceptors, and
//! keeps that decision stable no matter how proposals race or fail.
//!
//! # Architecture
//!
//! - **Proposers**: Drive a two-phase round ([`propose`]) under numbers
//!   minted by [`Proposer`]
//! - **Acceptors**: Judge each request against the highest number they
//!   promised ([`Acceptor`], or anything behind [`AcceptorEndpoint`])
//! - **Core**: Pure state machines in [`core`], shared between the runtime
//!   and the model checker
//!
//! # Quick Start
//!
//! ```ignore
//! use decree::{Acceptor, ProposalNumber, RoundResult, propose};
//!
//! let acceptors: Vec<Acceptor<u32, String>> =
//!     (0..3).map(|_| Acceptor::new()).collect();
//!
//! match propose("value".to_string(), &acceptors, ProposalNumber::new(1, 1)).await {
//!     RoundResult::Chosen(value) => println!("chosen: {value}"),
//!     RoundResult::NoQuorum => { /* retry with a higher number */ }
//! }
//! ```

#![warn(clippy::pedantic)]

// Submodules
mod acceptor;
mod config;
pub mod core;
mod proposer;
mod traits;

pub use acceptor::Acceptor;
pub use config::{BackoffConfig, ProposerConfig, Sleep, TokioSleep};
pub use proposer::{Proposer, propose};
pub use traits::AcceptorEndpoint;

pub use self::core::{AcceptResponse, PromiseResponse, Proposal, ProposalNumber, RoundResult};
