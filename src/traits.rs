//! The acceptor seam.

use core::fmt;
use core::hash::Hash;

use crate::core::{AcceptResponse, PromiseResponse, Proposal, ProposalNumber};

/// A proposer's handle to one acceptor.
///
/// Implementations range from in-process shared state ([`Acceptor`]) to a
/// remote acceptor behind a socket. Each call resolves to the acceptor's
/// verdict; a transport failure surfaces as `Err`, and the round counts it
/// as a denial.
///
/// Implementations MUST apply each request to the acceptor's state
/// atomically: two concurrent requests against the same acceptor must not
/// interleave their read of the promise threshold with their write of it.
///
/// [`Acceptor`]: crate::Acceptor
#[expect(async_fn_in_trait)]
pub trait AcceptorEndpoint {
    /// Identifier distinguishing proposers within proposal numbers.
    type ProposerId: Copy + Ord + fmt::Debug + Hash + Send + Sync;
    /// The value under agreement.
    type Value: Clone + fmt::Debug + Send + Sync;
    /// Transport failure.
    type Error: fmt::Debug;

    /// Phase 1: ask the acceptor to shut out proposals numbered below
    /// `number`.
    async fn prepare(
        &self,
        number: ProposalNumber<Self::ProposerId>,
    ) -> Result<PromiseResponse<Self::ProposerId, Self::Value>, Self::Error>;

    /// Phase 2: ask the acceptor to accept the proposal.
    async fn accept(
        &self,
        proposal: Proposal<Self::ProposerId, Self::Value>,
    ) -> Result<AcceptResponse, Self::Error>;
}
