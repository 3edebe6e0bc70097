//! Error types for the simulated chain.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Errors that can occur while executing simulated transactions.
#[derive(Debug, Error)]
pub enum SimError {
    /// A state update was attempted with a timestamp before the last update
    #[error("Invalid time travel: timestamp {timestamp} is before last update {last_update}")]
    InvalidTimeTravel { timestamp: u64, last_update: u64 },

    /// No token ledger deployed at this address
    #[error("Unknown token {token}")]
    UnknownToken { token: Address },

    /// Token balance too low for a transfer or burn
    #[error("Insufficient balance of {token} for {holder}: have {have}, need {need}")]
    InsufficientBalance {
        token: Address,
        holder: Address,
        have: U256,
        need: U256,
    },

    /// Spender allowance too low for a transferFrom
    #[error("Insufficient allowance of {token} from {owner} to {spender}: have {have}, need {need}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        have: U256,
        need: U256,
    },

    /// Pool position too small for the requested withdrawal
    #[error("Insufficient pool balance for {holder}: have {have}, need {need}")]
    InsufficientPoolBalance {
        holder: Address,
        have: U256,
        need: U256,
    },

    /// Tend was called with no idle want in the strategy
    #[error("Nothing to tend for strategy {strategy}")]
    NothingToTend { strategy: Address },
}

/// Result type alias for simulated operations.
pub type Result<T> = std::result::Result<T, SimError>;
