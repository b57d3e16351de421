use std::collections::VecDeque;
use std::fmt;
use tandem_core::IceCandidatePayload;

/// Where one agent is in the offer/answer exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    /// Joined (or joining) the room; no role decided yet, or responder waiting for the offer.
    AwaitingPeer,
    CreatingOffer,
    /// Initiator's offer is out. Stays here after the answer is applied until the engine connects.
    OfferSent,
    OfferReceived,
    AnsweringLocal,
    AnswerSent,
    Connected,
    Closed,
}

impl NegotiationState {
    pub fn is_closed(self) -> bool {
        self == NegotiationState::Closed
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Remote candidates that arrived before a remote description existed.
#[derive(Debug, Default)]
pub struct PendingCandidates {
    queue: VecDeque<IceCandidatePayload>,
}

impl PendingCandidates {
    pub fn push(&mut self, candidate: IceCandidatePayload) {
        self.queue.push_back(candidate);
    }

    /// Takes everything queued, oldest first. The queue is empty afterwards.
    pub fn take_all(&mut self) -> Vec<IceCandidatePayload> {
        self.queue.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IceCandidatePayload> {
        self.queue.iter()
    }
}
