//! Errors raised by the core building blocks.

use std::fmt;

use crate::timer::TimerId;

#[derive(Debug)]
pub enum CoreError {
    Timer(TimerError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timer(err) => write!(f, "timer queue: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
        }
    }
}

impl From<TimerError> for CoreError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// The timer already fired, was stopped, or never belonged to this queue.
    UnknownTimer(TimerId),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTimer(id) => write!(f, "no pending timer {id:?}"),
        }
    }
}

impl std::error::Error for TimerError {}

pub type Result<T> = std::result::Result<T, CoreError>;
