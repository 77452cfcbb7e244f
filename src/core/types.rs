//! Core type definitions shared by the state machines and the async runtime.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordering key for proposals - compares by (sequence, proposer).
///
/// A simple struct with lexicographic ordering. The sequence is monotonic per
/// proposer and the proposer identity breaks ties, so two distinct proposers
/// can never mint equal numbers.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProposalNumber<N> {
    /// Monotonic per-proposer sequence
    pub sequence: u64,
    /// Proposer identity
    pub proposer: N,
}

impl<N> ProposalNumber<N> {
    /// Create a new proposal number.
    #[must_use]
    pub fn new(sequence: u64, proposer: N) -> Self {
        Self {
            sequence,
            proposer,
        }
    }
}

/// An immutable (number, value) pair submitted for acceptance.
///
/// The protocol never inspects the value; it only compares numbers.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Proposal<N, V> {
    /// The round number the value travels under
    pub number: ProposalNumber<N>,
    /// The opaque payload
    pub value: V,
}

/// An acceptor's reply to a prepare request.
///
/// A denial carries no state: the proposer learns nothing from an acceptor
/// that has already promised a higher number.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PromiseResponse<N, V> {
    /// Whether the acceptor promised to honor this number
    pub granted: bool,
    /// The acceptor's highest accepted proposal, on the granted branch only
    pub previously_accepted: Option<Proposal<N, V>>,
}

impl<N, V> PromiseResponse<N, V> {
    /// The reply of an acceptor that will not honor the number.
    ///
    /// Also stands in for an acceptor that could not be consulted at all:
    /// for quorum purposes the two are identical.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            granted: false,
            previously_accepted: None,
        }
    }
}

/// An acceptor's verdict on an accept request.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcceptResponse {
    /// Whether the acceptor stored the proposal
    pub accepted: bool,
}

/// The outcome of one full round, consumed by the caller.
///
/// A failed round never carries a value, so a stale or partial result cannot
/// be mistaken for a decision.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoundResult<V> {
    /// A strict majority of acceptors accepted the value.
    Chosen(V),
    /// One of the phases fell short of a majority. Retrying with a strictly
    /// greater proposal number is the caller's call.
    NoQuorum,
}

impl<V> RoundResult<V> {
    /// Whether the round decided a value.
    #[must_use]
    pub fn is_chosen(&self) -> bool {
        matches!(self, Self::Chosen(_))
    }

    /// The decided value, if the round decided one.
    #[must_use]
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Chosen(value) => Some(value),
            Self::NoQuorum => None,
        }
    }
}
