//! The per-application phase state machine.
//!
//! Send and receive calls are only legal inside a bracketed phase, and
//! phase brackets act as collective barriers across the ranks of an
//! application. Misuse is a programming error: every illegal transition
//! returns a [`PhaseError`], never a silent no-op, because protocol
//! correctness across ranks depends on each rank taking identical
//! transitions in identical order.

use std::fmt;

use crate::error::PhaseError;

/// The three states an application's phase machine can be in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No phase open. The only state from which a phase may begin.
    #[default]
    Idle,
    /// Inside a `BeginSendPhase`/`EndSendPhase` bracket.
    Sending,
    /// Inside a `BeginReceivePhase`/`EndReceivePhase` bracket.
    Receiving,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Sending => write!(f, "Sending"),
            Self::Receiving => write!(f, "Receiving"),
        }
    }
}

/// Operations checked against the phase machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseOp {
    /// `BeginSendPhase`.
    BeginSend,
    /// `EndSendPhase`.
    EndSend,
    /// `BeginReceivePhase`.
    BeginReceive,
    /// `EndReceivePhase`.
    EndReceive,
    /// A field `Send`, legal only while `Sending`.
    Send,
    /// A field `Receive`, legal only while `Receiving`.
    Receive,
}

impl fmt::Display for PhaseOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeginSend => write!(f, "BeginSendPhase"),
            Self::EndSend => write!(f, "EndSendPhase"),
            Self::BeginReceive => write!(f, "BeginReceivePhase"),
            Self::EndReceive => write!(f, "EndReceivePhase"),
            Self::Send => write!(f, "Send"),
            Self::Receive => write!(f, "Receive"),
        }
    }
}

/// Phase state machine for one application.
///
/// Legal cycles are `Idle → Sending → Idle` and `Idle → Receiving → Idle`;
/// everything else fails. A field can never be sent and received within
/// the same bracket because no state permits both operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseState {
    current: Phase,
}

impl PhaseState {
    /// A fresh machine in [`Phase::Idle`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    pub fn current(&self) -> Phase {
        self.current
    }

    /// `Idle → Sending`.
    pub fn begin_send(&mut self) -> Result<(), PhaseError> {
        self.transition(Phase::Idle, Phase::Sending, PhaseOp::BeginSend)
    }

    /// `Sending → Idle`.
    pub fn end_send(&mut self) -> Result<(), PhaseError> {
        self.transition(Phase::Sending, Phase::Idle, PhaseOp::EndSend)
    }

    /// `Idle → Receiving`.
    pub fn begin_receive(&mut self) -> Result<(), PhaseError> {
        self.transition(Phase::Idle, Phase::Receiving, PhaseOp::BeginReceive)
    }

    /// `Receiving → Idle`.
    pub fn end_receive(&mut self) -> Result<(), PhaseError> {
        self.transition(Phase::Receiving, Phase::Idle, PhaseOp::EndReceive)
    }

    /// Check that `op` is legal in the current phase without transitioning.
    ///
    /// Used by field `Send`/`Receive`, which require an open bracket of
    /// the matching kind.
    pub fn require(&self, expected: Phase, op: PhaseOp) -> Result<(), PhaseError> {
        if self.current == expected {
            Ok(())
        } else {
            Err(PhaseError {
                from: self.current,
                op,
            })
        }
    }

    fn transition(&mut self, from: Phase, to: Phase, op: PhaseOp) -> Result<(), PhaseError> {
        if self.current == from {
            self.current = to;
            Ok(())
        } else {
            Err(PhaseError {
                from: self.current,
                op,
            })
        }
    }
}
