use crate::{backend::AccountBackend, manager::SmartAccountManager};
use l2_primitives::{TransactionStatus, UserOperationRequest};
use std::fmt;
use tracing::{info, warn};

type Observer = Box<dyn Fn(&TransactionStatus) + Send + Sync>;

/// Tracks one operation at a time: `Ready -> Sending -> Pending -> Success | Error`
///
/// A final status stays until [reset](TransactionTracker::reset) or the next
/// [send](TransactionTracker::send).
#[derive(Default)]
pub struct TransactionTracker {
    status: TransactionStatus,
    observer: Option<Observer>,
}

impl TransactionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `observer` on every status transition
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&TransactionStatus) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    /// Back to `Ready`, unless an operation is in flight
    pub fn reset(&mut self) {
        if !self.status.is_busy() {
            self.transition(TransactionStatus::Ready);
        }
    }

    fn transition(&mut self, status: TransactionStatus) {
        self.status = status;
        if let Some(observer) = &self.observer {
            observer(&self.status);
        }
    }

    /// Submits `request` through `manager` and follows it until it is mined or fails
    ///
    /// # Returns
    /// * `&TransactionStatus` - The final status (`Success` with the transaction hash, or `Error`)
    pub async fn send<B: AccountBackend>(
        &mut self,
        manager: &SmartAccountManager<B>,
        request: UserOperationRequest,
    ) -> &TransactionStatus {
        if self.status.is_busy() {
            warn!("Operation already in flight ({}), ignoring the new one", self.status);
            return &self.status;
        }

        self.transition(TransactionStatus::Sending);

        let handle = match manager.submit_operation(request).await {
            Ok(handle) => handle,
            Err(err) => {
                warn!("User operation failed: {err}");
                self.transition(TransactionStatus::Error(err.to_string()));
                return &self.status;
            }
        };

        self.transition(TransactionStatus::Pending);

        let status = match manager.wait_for_receipt(&handle).await {
            Ok(receipt) if receipt.success => {
                info!(
                    "User operation {} included in transaction {:?}",
                    handle.hash(),
                    receipt.transaction_hash()
                );
                TransactionStatus::Success(receipt.transaction_hash())
            }
            Ok(receipt) => {
                let message = if receipt.reason.is_empty() {
                    "user operation reverted".to_string()
                } else {
                    format!("user operation reverted: {}", receipt.reason)
                };
                warn!("User operation {} {message}", handle.hash());
                TransactionStatus::Error(message)
            }
            Err(err) => {
                warn!("User operation {} failed: {err}", handle.hash());
                TransactionStatus::Error(err.to_string())
            }
        };

        self.transition(status);
        &self.status
    }
}

impl fmt::Debug for TransactionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionTracker").field("status", &self.status).finish()
    }
}
