//! Proposer state machine for one round.

use super::quorum::is_majority;
use super::types::{AcceptResponse, PromiseResponse, Proposal, ProposalNumber};

/// Pure proposer state - tracks the phase and tallies for a single round.
///
/// The tallies are plain counts: the caller must feed each acceptor's
/// response at most once per phase (the async runtime guarantees this by
/// holding one in-flight call per acceptor, the model checker by sending one
/// request per acceptor).
///
/// Phase decisions are made as early as they are determined: quorum the
/// moment a majority lands, exhaustion the moment the outstanding responses
/// can no longer produce one. Responses arriving after a decision are
/// ignored.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProposerCore<N, V> {
    /// This round's number
    number: ProposalNumber<N>,
    /// Value being proposed (or adopted from a previously accepted proposal)
    value: V,
    /// Size of the acceptor set the round runs against
    membership: usize,
    /// Current phase
    phase: ProposerPhase<N, V>,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
enum ProposerPhase<N, V> {
    /// Collecting promises (phase 1)
    Preparing {
        granted: usize,
        observed: usize,
        /// Highest-numbered previously accepted proposal among grants
        adopted: Option<Proposal<N, V>>,
    },
    /// Collecting accept verdicts (phase 2)
    Accepting { accepted: usize, observed: usize },
    /// A majority accepted the value
    Chosen,
    /// A phase fell short of a majority
    Failed,
}

/// Result of feeding one promise to the prepare phase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PreparePhaseResult<V> {
    /// Need more responses
    Pending,
    /// Majority granted - request accepts for this value
    Quorum {
        /// The candidate, or the adopted value when a granted response
        /// carried a previously accepted proposal
        value: V,
    },
    /// Too many denials - a majority can no longer be assembled
    Exhausted,
}

/// Result of feeding one accept verdict to the accept phase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AcceptPhaseResult<V> {
    /// Need more verdicts
    Pending,
    /// Majority accepted - the round decided
    Chosen {
        /// The decided value
        value: V,
    },
    /// Too many denials - a majority can no longer be assembled
    Exhausted,
}

impl<N, V> ProposerCore<N, V>
where
    N: Copy + Ord,
    V: Clone,
{
    /// Start a round in the prepare phase.
    ///
    /// `membership` is the size of the acceptor set; the majority threshold
    /// is derived from it, never assumed.
    #[must_use]
    pub fn new(number: ProposalNumber<N>, candidate: V, membership: usize) -> Self {
        Self {
            number,
            value: candidate,
            membership,
            phase: ProposerPhase::Preparing {
                granted: 0,
                observed: 0,
                adopted: None,
            },
        }
    }

    /// This round's number.
    #[must_use]
    pub fn number(&self) -> ProposalNumber<N> {
        self.number
    }

    /// The value the round currently carries.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Whether the round is still collecting promises.
    #[must_use]
    pub fn is_preparing(&self) -> bool {
        matches!(self.phase, ProposerPhase::Preparing { .. })
    }

    /// Whether the round is collecting accept verdicts.
    #[must_use]
    pub fn is_accepting(&self) -> bool {
        matches!(self.phase, ProposerPhase::Accepting { .. })
    }

    /// Whether a majority accepted the value.
    #[must_use]
    pub fn is_chosen(&self) -> bool {
        matches!(self.phase, ProposerPhase::Chosen)
    }

    /// Whether a phase fell short of a majority.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.phase, ProposerPhase::Failed)
    }

    /// Feed one acceptor's reply to this round's prepare.
    ///
    /// At quorum the value to propose is settled: the highest-numbered
    /// previously accepted proposal among the granted responses wins over
    /// the candidate. Out-of-phase calls are ignored.
    pub fn handle_promise(&mut self, response: PromiseResponse<N, V>) -> PreparePhaseResult<V> {
        let ProposerPhase::Preparing {
            granted,
            observed,
            adopted,
        } = &mut self.phase
        else {
            return PreparePhaseResult::Pending;
        };

        *observed += 1;
        if response.granted {
            *granted += 1;
            if let Some(previous) = response.previously_accepted
                && adopted
                    .as_ref()
                    .is_none_or(|best| previous.number > best.number)
            {
                *adopted = Some(previous);
            }
        }

        if is_majority(*granted, self.membership) {
            let value = adopted
                .take()
                .map_or_else(|| self.value.clone(), |previous| previous.value);
            self.value = value.clone();
            self.phase = ProposerPhase::Accepting {
                accepted: 0,
                observed: 0,
            };
            return PreparePhaseResult::Quorum { value };
        }

        let outstanding = self.membership - *observed;
        if !is_majority(*granted + outstanding, self.membership) {
            self.phase = ProposerPhase::Failed;
            return PreparePhaseResult::Exhausted;
        }

        PreparePhaseResult::Pending
    }

    /// Feed one acceptor's verdict on this round's accept request.
    ///
    /// Out-of-phase calls are ignored.
    pub fn handle_accepted(&mut self, response: AcceptResponse) -> AcceptPhaseResult<V> {
        let ProposerPhase::Accepting { accepted, observed } = &mut self.phase else {
            return AcceptPhaseResult::Pending;
        };

        *observed += 1;
        if response.accepted {
            *accepted += 1;
        }

        if is_majority(*accepted, self.membership) {
            self.phase = ProposerPhase::Chosen;
            return AcceptPhaseResult::Chosen {
                value: self.value.clone(),
            };
        }

        let outstanding = self.membership - *observed;
        if !is_majority(*accepted + outstanding, self.membership) {
            self.phase = ProposerPhase::Failed;
            return AcceptPhaseResult::Exhausted;
        }

        AcceptPhaseResult::Pending
    }
}
