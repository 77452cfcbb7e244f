//! In-process acceptor runtime.

use core::fmt;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::core::{AcceptResponse, AcceptorCore, PromiseResponse, Proposal, ProposalNumber};
use crate::traits::AcceptorEndpoint;

/// In-memory acceptor sharing one [`AcceptorCore`] across clones.
///
/// Cloning hands out another handle to the same state, so every proposer in
/// the process can hold its own copy. Each request locks the state for the
/// whole decision, keeping the read of the promise threshold and the write
/// of it atomic.
pub struct Acceptor<N, V> {
    inner: Arc<Mutex<AcceptorCore<N, V>>>,
}

impl<N, V> Clone for Acceptor<N, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N, V> Default for Acceptor<N, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, V> Acceptor<N, V> {
    /// Create an acceptor that has promised and accepted nothing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(AcceptorCore::default())),
        }
    }

    /// Restore an acceptor from a previously taken [`snapshot`].
    ///
    /// [`snapshot`]: Acceptor::snapshot
    #[must_use]
    pub fn restore(snapshot: AcceptorCore<N, V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(snapshot)),
        }
    }
}

impl<N, V> Acceptor<N, V>
where
    N: Copy + Ord + fmt::Debug,
    V: Clone,
{
    /// Create with accepted state loaded from persistence.
    ///
    /// The restored proposal also seeds the promise threshold, so the
    /// acceptor cannot betray a promise it made before restarting.
    #[must_use]
    pub fn with_accepted(proposal: Proposal<N, V>) -> Self {
        Self::restore(AcceptorCore {
            promised: Some(proposal.number),
            accepted: Some(proposal),
        })
    }

    /// Copy of the current state, e.g. to hand to persistence.
    #[must_use]
    pub fn snapshot(&self) -> AcceptorCore<N, V> {
        self.inner.lock().unwrap().clone()
    }

    /// Apply a prepare request and return this acceptor's reply.
    pub fn prepare(&self, number: ProposalNumber<N>) -> PromiseResponse<N, V> {
        let response = self.inner.lock().unwrap().prepare(number);
        if response.granted {
            trace!(?number, "promised");
        } else {
            trace!(?number, "promise rejected - outdated");
        }
        response
    }

    /// Apply an accept request and return this acceptor's verdict.
    pub fn accept(&self, proposal: Proposal<N, V>) -> AcceptResponse {
        let number = proposal.number;
        let response = self.inner.lock().unwrap().accept(proposal);
        if response.accepted {
            trace!(?number, "accepted");
        } else {
            trace!(?number, "accept rejected - outdated");
        }
        response
    }
}

impl<N, V> AcceptorEndpoint for Acceptor<N, V>
where
    N: Copy + Ord + fmt::Debug + std::hash::Hash + Send + Sync,
    V: Clone + fmt::Debug + Send + Sync,
{
    type ProposerId = N;
    type Value = V;
    type Error = Infallible;

    async fn prepare(
        &self,
        number: ProposalNumber<N>,
    ) -> Result<PromiseResponse<N, V>, Infallible> {
        Ok(Acceptor::prepare(self, number))
    }

    async fn accept(&self, proposal: Proposal<N, V>) -> Result<AcceptResponse, Infallible> {
        Ok(Acceptor::accept(self, proposal))
    }
}
