//! Pending chain-validation steps and their continuations.

use crate::error::ValidationFailure;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::warn;
use verity_core::{Name, SignedItem};

/// The outcome a continuation delivers.
pub type ValidationOutcome = Result<SignedItem, ValidationFailure>;

type Resolver = Box<dyn FnOnce(ValidationOutcome) + Send>;

/// A one-shot success/failure continuation pair.
///
/// Fires exactly once: the first resolution wins and any later one is a
/// logged no-op, so a duplicate fetch completion can never re-enter the
/// caller.
pub struct Continuation {
    resolver: Mutex<Option<Resolver>>,
}

impl Continuation {
    /// A continuation that forwards its outcome into a oneshot channel.
    pub fn channel() -> (Self, oneshot::Receiver<ValidationOutcome>) {
        let (tx, rx) = oneshot::channel();
        let continuation = Self::new(move |outcome| {
            // The receiver may itself have been dropped; nothing to do then.
            let _ = tx.send(outcome);
        });
        (continuation, rx)
    }

    /// A continuation that splits its outcome across two callbacks.
    pub fn from_callbacks(
        on_validated: impl FnOnce(SignedItem) + Send + 'static,
        on_failed: impl FnOnce(ValidationFailure) + Send + 'static,
    ) -> Self {
        Self::new(move |outcome| match outcome {
            Ok(item) => on_validated(item),
            Err(failure) => on_failed(failure),
        })
    }

    fn new(resolver: impl FnOnce(ValidationOutcome) + Send + 'static) -> Self {
        Self {
            resolver: Mutex::new(Some(Box::new(resolver))),
        }
    }

    /// Deliver the outcome. Returns `false` if already resolved.
    pub fn resolve(&self, outcome: ValidationOutcome) -> bool {
        // The resolver runs outside the lock, so a callback that resolves
        // again hits the already-taken path instead of deadlocking.
        let resolver = self.resolver.lock().take();
        match resolver {
            Some(resolver) => {
                resolver(outcome);
                true
            }
            None => {
                warn!("continuation resolved more than once; ignoring");
                false
            }
        }
    }

    /// Deliver success.
    pub fn succeed(&self, item: SignedItem) -> bool {
        self.resolve(Ok(item))
    }

    /// Deliver failure.
    pub fn fail(&self, failure: ValidationFailure) -> bool {
        self.resolve(Err(failure))
    }
}

impl std::fmt::Debug for Continuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Continuation")
            .field("resolved", &self.resolver.lock().is_none())
            .finish()
    }
}

/// One certificate the policy needs before it can trust an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequirement {
    /// Name of the certificate to fetch and validate.
    pub certificate_name: Name,
}

impl CertificateRequirement {
    /// Require the certificate published under `certificate_name`.
    pub fn new(certificate_name: Name) -> Self {
        Self { certificate_name }
    }
}

/// One pending chain-validation step.
///
/// Created by the engine when policy evaluation escalates; carries its own
/// remaining step budget (explicitly, not via call-stack depth) and the
/// continuation that fires exactly once when the step settles.
#[derive(Debug)]
pub struct ValidationRequest {
    /// The content whose trust hinges on this step.
    pub item: SignedItem,
    /// The certificate this step must obtain and validate.
    pub certificate_name: Name,
    /// Remaining chain steps below this one.
    pub steps_remaining: u32,
    /// Settles this step.
    pub continuation: Continuation,
}

impl ValidationRequest {
    /// Build a pending step.
    pub fn new(
        item: SignedItem,
        certificate_name: Name,
        steps_remaining: u32,
        continuation: Continuation,
    ) -> Self {
        Self {
            item,
            certificate_name,
            steps_remaining,
            continuation,
        }
    }
}
