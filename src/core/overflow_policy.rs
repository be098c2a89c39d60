//! Overflow policies for the remote delivery queue
//!
//! When the shipper's bounded queue is full, the policy decides whether the
//! logging call drops the document or waits for room.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling a full delivery queue
///
/// # Example
///
/// ```
/// use fieldlog::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: drop and count
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::DropNewest);
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Drop the new document and count it
    #[default]
    DropNewest,

    /// Block until space is available
    ///
    /// Stalls the logging call while the collector is slow.
    Block,

    /// Block with timeout, then drop
    BlockWithTimeout(Duration),
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called when documents are dropped because the queue is full.
/// The parameter is the total count of dropped documents so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::DropNewest);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
    }

    #[test]
    fn test_overflow_policy_deserialize() {
        let policy: OverflowPolicy = serde_json::from_str("\"Block\"").unwrap();
        assert_eq!(policy, OverflowPolicy::Block);
    }
}
