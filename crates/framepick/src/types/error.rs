/*! Error types for framepick operations. */

use derive_more::Display;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Outcome of the most recent attempt to reach the bound iframe's document.
///
/// This is state, not a failure raised to the caller: every variant is
/// recoverable and `enable()` can simply be retried later.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS, Display,
)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum BridgeError {
  /// The document was reached.
  #[default]
  #[display("none")]
  None,
  /// No iframe is bound.
  #[display("no-iframe")]
  NoIframe,
  /// An iframe is bound but its document is not available yet (still loading).
  #[display("not-ready")]
  NotReady,
  /// Reading the document was refused by the browser's same-origin policy.
  #[display("cross-origin")]
  CrossOrigin,
}

impl BridgeError {
  /// True when the document was reached.
  pub const fn is_none(self) -> bool {
    matches!(self, Self::None)
  }
}

/// Errors raised by platform operations.
///
/// These stay inside the bridge: it logs them and degrades instead of
/// failing a public operation.
#[derive(Debug, thiserror::Error)]
pub enum FramepickError {
  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Failed to inject marker stylesheet: {0}")]
  StyleInjection(String),

  #[error("Failed to register listener: {0}")]
  Listener(String),
}

/// Result type for framepick operations.
pub type FramepickResult<T> = Result<T, FramepickError>;
