//! Status of a single operation as presented to the user

use ethers::types::H256;
use std::fmt;

/// Per-operation status: `Ready -> Sending -> Pending -> Success | Error -> Ready`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TransactionStatus {
    #[default]
    Ready,
    Sending,
    Pending,
    /// Mined, with the transaction hash that included the operation
    Success(H256),
    Error(String),
}

impl TransactionStatus {
    /// An operation is in flight (submission or confirmation)
    pub fn is_busy(&self) -> bool {
        matches!(self, TransactionStatus::Sending | TransactionStatus::Pending)
    }

    pub fn tx_hash(&self) -> Option<H256> {
        match self {
            TransactionStatus::Success(hash) => Some(*hash),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TransactionStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Ready => write!(f, "ready"),
            TransactionStatus::Sending => write!(f, "preparing transaction"),
            TransactionStatus::Pending => write!(f, "confirming on-chain"),
            TransactionStatus::Success(hash) => write!(f, "success ({hash:?})"),
            TransactionStatus::Error(message) => write!(f, "failed: {message}"),
        }
    }
}
