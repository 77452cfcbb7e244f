//! Proposer implementation
//!
//! Each round fans the phase requests out to every acceptor at once and
//! feeds the responses into [`ProposerCore`] as they land. The round returns
//! as soon as the outcome is determined; responses still in flight are
//! dropped.

use core::fmt;
use std::{pin::pin, time::Duration};

use futures::{StreamExt, stream::FuturesUnordered};
use rand::Rng;
use tracing::{debug, instrument, trace};

use crate::{
    AcceptorEndpoint, ProposerConfig, Sleep, TokioSleep,
    core::{
        AcceptPhaseResult, AcceptResponse, PreparePhaseResult, PromiseResponse, Proposal,
        ProposalNumber, ProposerCore, RoundResult,
    },
};

/// Run one round of the protocol under proposal number `number`.
///
/// Phase 1 asks every acceptor for a promise; with a majority granted, phase
/// 2 asks every acceptor to accept the settled value (the candidate, unless
/// a promise revealed a previously accepted proposal). Majorities are judged
/// against the full acceptor list, so the caller must pass the complete
/// membership, not just the acceptors it believes are up.
///
/// An unreachable acceptor counts as a denial. The round never retries: on
/// [`RoundResult::NoQuorum`] the caller picks a strictly higher number and
/// proposes again, or gives up. [`Proposer`] wraps that loop.
#[instrument(skip_all, name = "propose", fields(number = ?number))]
pub async fn propose<E: AcceptorEndpoint>(
    candidate: E::Value,
    acceptors: &[E],
    number: ProposalNumber<E::ProposerId>,
) -> RoundResult<E::Value> {
    run_round(candidate, acceptors, number, &TokioSleep, None).await
}

/// Both phases of one round, with an optional per-phase deadline.
pub(crate) async fn run_round<E, S>(
    candidate: E::Value,
    acceptors: &[E],
    number: ProposalNumber<E::ProposerId>,
    sleep: &S,
    phase_timeout: Option<Duration>,
) -> RoundResult<E::Value>
where
    E: AcceptorEndpoint,
    S: Sleep,
{
    let membership = acceptors.len();
    let mut core = ProposerCore::new(number, candidate, membership);

    let mut requests: FuturesUnordered<_> = acceptors
        .iter()
        .map(|acceptor| acceptor.prepare(number))
        .collect();
    trace!(membership, "collecting promises");

    // Create timeout future for prepare phase
    let prepare_timeout = async {
        if let Some(timeout) = phase_timeout {
            sleep.sleep(timeout).await;
            true
        } else {
            std::future::pending::<bool>().await
        }
    };
    let mut prepare_timeout = pin!(prepare_timeout);

    // Prepare phase: collect promises
    let value = loop {
        let response = tokio::select! {
            biased;
            response = requests.next() => response,
            _ = &mut prepare_timeout => {
                debug!("prepare phase timed out");
                return RoundResult::NoQuorum;
            }
        };

        // Responses only run dry without a decision when the list is empty.
        let Some(response) = response else {
            debug!("no acceptors to collect promises from");
            return RoundResult::NoQuorum;
        };

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                debug!(?error, "prepare request failed");
                PromiseResponse::denied()
            }
        };

        match core.handle_promise(response) {
            PreparePhaseResult::Quorum { value } => {
                debug!("prepare phase complete");
                break value;
            }
            PreparePhaseResult::Exhausted => {
                debug!("prepare phase exhausted");
                return RoundResult::NoQuorum;
            }
            PreparePhaseResult::Pending => {
                // Need more promises
            }
        }
    };

    // Accept phase goes to the full list, promised or not. Acceptors that
    // never saw the prepare judge the accept against their own threshold.
    let proposal = Proposal { number, value };
    let mut verdicts: FuturesUnordered<_> = acceptors
        .iter()
        .map(|acceptor| acceptor.accept(proposal.clone()))
        .collect();
    trace!("collecting accepts");

    // Create timeout future for accept phase
    let accept_timeout = async {
        if let Some(timeout) = phase_timeout {
            sleep.sleep(timeout).await;
            true
        } else {
            std::future::pending::<bool>().await
        }
    };
    let mut accept_timeout = pin!(accept_timeout);

    // Accept phase: collect accepts
    loop {
        let verdict = tokio::select! {
            biased;
            verdict = verdicts.next() => verdict,
            _ = &mut accept_timeout => {
                debug!("accept phase timed out");
                return RoundResult::NoQuorum;
            }
        };

        let Some(verdict) = verdict else {
            debug!("no acceptors to collect accepts from");
            return RoundResult::NoQuorum;
        };

        let verdict = match verdict {
            Ok(verdict) => verdict,
            Err(error) => {
                debug!(?error, "accept request failed");
                AcceptResponse { accepted: false }
            }
        };

        match core.handle_accepted(verdict) {
            AcceptPhaseResult::Chosen { value } => {
                debug!("accept phase complete");
                return RoundResult::Chosen(value);
            }
            AcceptPhaseResult::Exhausted => {
                debug!("accept phase exhausted");
                return RoundResult::NoQuorum;
            }
            AcceptPhaseResult::Pending => {
                // Need more accepts
            }
        }
    }
}

/// Mints this node's proposal numbers and drives rounds with them.
///
/// Numbers are strictly increasing per instance and carry the node id, so
/// two proposers never mint the same number. The counter lives in the
/// instance; give each node id exactly one, since a copy would hand out
/// numbers the original already used.
#[derive(Debug)]
pub struct Proposer<N> {
    node: N,
    sequence: u64,
}

impl<N: Copy + fmt::Debug> Proposer<N> {
    /// Create a proposer for the node with the given id.
    #[must_use]
    pub fn new(node: N) -> Self {
        Self { node, sequence: 0 }
    }

    /// Mint a number higher than any this instance handed out before.
    pub fn next_number(&mut self) -> ProposalNumber<N> {
        self.sequence += 1;
        ProposalNumber::new(self.sequence, self.node)
    }

    /// Run one round under a freshly minted number.
    #[instrument(skip_all, name = "proposer", fields(node_id = ?self.node))]
    pub async fn propose<E, S, R>(
        &mut self,
        candidate: E::Value,
        acceptors: &[E],
        config: &mut ProposerConfig<S, R>,
    ) -> RoundResult<E::Value>
    where
        E: AcceptorEndpoint<ProposerId = N>,
        S: Sleep,
        R: Rng,
    {
        let number = self.next_number();
        debug!(?number, "attempting proposal");
        run_round(
            candidate,
            acceptors,
            number,
            &config.sleep,
            config.phase_timeout,
        )
        .await
    }

    /// Propose under ever higher numbers until some value is chosen.
    ///
    /// The chosen value may differ from `candidate` when an earlier proposal
    /// got far enough for a round here to adopt it. Rounds that fail back
    /// off with jitter before the next attempt; if a majority of acceptors
    /// stays unreachable, this never returns.
    #[instrument(skip_all, name = "proposer", fields(node_id = ?self.node))]
    pub async fn propose_until_chosen<E, S, R>(
        &mut self,
        candidate: E::Value,
        acceptors: &[E],
        config: &mut ProposerConfig<S, R>,
    ) -> E::Value
    where
        E: AcceptorEndpoint<ProposerId = N>,
        S: Sleep,
        R: Rng,
    {
        for consecutive_rejections in 0.. {
            let number = self.next_number();
            debug!(?number, consecutive_rejections, "attempting proposal");

            let result = run_round(
                candidate.clone(),
                acceptors,
                number,
                &config.sleep,
                config.phase_timeout,
            )
            .await;

            match result {
                RoundResult::Chosen(value) => {
                    debug!("proposal chosen");
                    return value;
                }
                RoundResult::NoQuorum => {
                    debug!("round failed, will retry");
                }
            }

            // Backoff before retry
            let backoff = config
                .backoff
                .duration(consecutive_rejections, &mut config.rng);
            trace!(?backoff, "backing off before retry");
            config.sleep.sleep(backoff).await;
        }

        unreachable!("infinite loop should return from inside")
    }
}
