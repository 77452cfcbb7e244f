//! Acceptor state machine.

use super::types::{AcceptResponse, PromiseResponse, Proposal, ProposalNumber};

/// Pure acceptor state - no I/O, no async, no synchronization.
///
/// Tracks the highest number this acceptor has promised and the
/// highest-numbered proposal it has accepted. Both transitions are monotonic
/// in `promised`; there is no terminal state, so the acceptor stays available
/// for higher-numbered rounds indefinitely.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AcceptorCore<N, V> {
    /// Highest promised number; `None` compares below every number
    pub promised: Option<ProposalNumber<N>>,
    /// Highest accepted proposal
    pub accepted: Option<Proposal<N, V>>,
}

#[expect(
    clippy::derivable_impls,
    reason = "derive(Default) doesn't work with generic bounds"
)]
impl<N, V> Default for AcceptorCore<N, V> {
    fn default() -> Self {
        Self {
            promised: None,
            accepted: None,
        }
    }
}

impl<N, V> AcceptorCore<N, V>
where
    N: Copy + Ord,
    V: Clone,
{
    /// Create a fresh acceptor that has promised and accepted nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a prepare request - pure state transition.
    ///
    /// Grants when the number is strictly greater than the current promise,
    /// moving the promise forward and returning the accepted proposal so the
    /// proposer can apply the adoption rule. A denial carries nothing and
    /// leaves all state untouched. Never modifies `accepted`.
    pub fn prepare(&mut self, number: ProposalNumber<N>) -> PromiseResponse<N, V> {
        if self.promised.is_none_or(|promised| number > promised) {
            self.promised = Some(number);
            PromiseResponse {
                granted: true,
                previously_accepted: self.accepted.clone(),
            }
        } else {
            PromiseResponse::denied()
        }
    }

    /// Handle an accept request - pure state transition.
    ///
    /// Accepts when the number is at least the current promise: an acceptor
    /// must honor the very number it just promised, so the comparison is
    /// `>=` where `prepare` uses `>`. On success both `promised` and
    /// `accepted` move to the incoming proposal.
    pub fn accept(&mut self, proposal: Proposal<N, V>) -> AcceptResponse {
        if self.promised.is_none_or(|promised| proposal.number >= promised) {
            self.promised = Some(proposal.number);
            self.accepted = Some(proposal);
            AcceptResponse { accepted: true }
        } else {
            AcceptResponse { accepted: false }
        }
    }
}
