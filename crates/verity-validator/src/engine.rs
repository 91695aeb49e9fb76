//! The trust-chain validation engine.

use crate::config::ValidatorConfig;
use crate::error::ValidationFailure;
use crate::policy::{PolicyDecision, ValidationPolicy};
use crate::request::{CertificateRequirement, Continuation, ValidationRequest};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, warn};
use verity_cert::Certificate;
use verity_core::{
    CertificateFetch, Clock, FetchError, Name, SignatureVerify, SignedItem, SystemClock,
};

/// Policy-driven, step-bounded chain validator.
///
/// One engine instance serves many concurrent top-level validations; all
/// state lives in the per-call step budget, so concurrent chains never
/// share budget.
pub struct Validator<P> {
    policy: P,
    fetcher: Arc<dyn CertificateFetch>,
    verifier: Arc<dyn SignatureVerify>,
    clock: Arc<dyn Clock>,
    config: ValidatorConfig,
}

impl<P: ValidationPolicy> Validator<P> {
    /// Build an engine from its policy, collaborators, and configuration.
    pub fn new(
        policy: P,
        fetcher: Arc<dyn CertificateFetch>,
        verifier: Arc<dyn SignatureVerify>,
        clock: Arc<dyn Clock>,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            policy,
            fetcher,
            verifier,
            clock,
            config,
        }
    }

    /// [`new`](Self::new) with the system clock and default configuration.
    pub fn with_defaults(
        policy: P,
        fetcher: Arc<dyn CertificateFetch>,
        verifier: Arc<dyn SignatureVerify>,
    ) -> Self {
        Self::new(
            policy,
            fetcher,
            verifier,
            Arc::new(SystemClock),
            ValidatorConfig::default(),
        )
    }

    /// The engine's configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate one item, returning it once trusted.
    ///
    /// Failures arrive as the `Err` arm; nothing is thrown across the
    /// asynchronous boundary.
    pub async fn validate(&self, item: SignedItem) -> Result<SignedItem, ValidationFailure> {
        self.validate_inner(item, self.config.max_steps).await
    }

    /// Continuation-style entry point: spawns the validation and routes the
    /// outcome through exactly one of the two callbacks.
    pub fn validate_with(
        self: &Arc<Self>,
        item: SignedItem,
        on_validated: impl FnOnce(SignedItem) + Send + 'static,
        on_failed: impl FnOnce(ValidationFailure) + Send + 'static,
    ) -> tokio::task::JoinHandle<()>
    where
        P: 'static,
    {
        let engine = Arc::clone(self);
        let continuation = Continuation::from_callbacks(on_validated, on_failed);
        tokio::spawn(async move {
            let outcome = engine.validate(item).await;
            continuation.resolve(outcome);
        })
    }

    fn validate_inner(
        &self,
        item: SignedItem,
        steps_remaining: u32,
    ) -> BoxFuture<'_, Result<SignedItem, ValidationFailure>> {
        async move {
            match self.policy.check_policy(&item, steps_remaining).await {
                PolicyDecision::Accept => {
                    debug!(item = %item.name(), "policy accepted");
                    Ok(item)
                }
                PolicyDecision::Reject(failure) => {
                    debug!(item = %item.name(), %failure, "policy rejected");
                    Err(failure)
                }
                PolicyDecision::Escalate(requirements) => {
                    // An escalation that names nothing would accept the item
                    // with no signature checked; the policy contract forbids
                    // it.
                    if requirements.is_empty() {
                        warn!(item = %item.name(), "policy escalated without requirements");
                        return Err(ValidationFailure::PolicyRejected {
                            reason: "policy escalated without naming a certificate".to_owned(),
                        });
                    }
                    // The bound is enforced before any fetch is issued, so a
                    // cyclic chain costs at most max_steps fetches.
                    if steps_remaining == 0 {
                        warn!(item = %item.name(), "validation depth exceeded");
                        return Err(ValidationFailure::DepthExceeded {
                            limit: self.config.max_steps,
                        });
                    }
                    debug!(
                        item = %item.name(),
                        pending = requirements.len(),
                        "policy escalated"
                    );
                    // Sub-validations run concurrently; each keeps its own
                    // budget relative to this ancestor chain.
                    let steps = requirements.into_iter().map(|requirement| {
                        self.chain_step(item.clone(), requirement, steps_remaining - 1)
                    });
                    let certificates = futures::future::try_join_all(steps).await?;
                    // The chain above is now trusted; the item's own
                    // signature must verify against the keys it named.
                    for certificate in &certificates {
                        self.verify_item(&item, certificate).await?;
                    }
                    Ok(item)
                }
            }
        }
        .boxed()
    }

    /// Run one pending chain step to completion.
    ///
    /// The step's outcome travels through the request's exactly-once
    /// continuation; the trusted certificate is handed back for the
    /// caller's signature check.
    async fn chain_step(
        &self,
        item: SignedItem,
        requirement: CertificateRequirement,
        steps_remaining: u32,
    ) -> Result<Certificate, ValidationFailure> {
        let (continuation, receiver) = Continuation::channel();
        let request = ValidationRequest::new(
            item,
            requirement.certificate_name,
            steps_remaining,
            continuation,
        );
        let certificate = self.execute(&request).await;

        let outcome = receiver.await.unwrap_or_else(|_| {
            Err(ValidationFailure::PolicyRejected {
                reason: "validation request dropped unresolved".to_owned(),
            })
        });
        match (outcome, certificate) {
            (Ok(_trusted), Some(certificate)) => Ok(certificate),
            (Err(failure), _) => Err(failure),
            (Ok(trusted), None) => Err(ValidationFailure::PolicyRejected {
                reason: format!("chain step for {} settled inconsistently", trusted.name()),
            }),
        }
    }

    /// Fetch, decode, window-check, and recursively validate the requested
    /// certificate, settling the request's continuation exactly once.
    async fn execute(&self, request: &ValidationRequest) -> Option<Certificate> {
        match self
            .obtain_and_validate(&request.certificate_name, request.steps_remaining)
            .await
        {
            Ok(certificate) => {
                request.continuation.succeed(request.item.clone());
                Some(certificate)
            }
            Err(failure) => {
                request.continuation.fail(failure);
                None
            }
        }
    }

    async fn obtain_and_validate(
        &self,
        name: &Name,
        steps_remaining: u32,
    ) -> Result<Certificate, ValidationFailure> {
        let fetched =
            tokio::time::timeout(self.config.fetch_timeout(), self.fetcher.fetch(name)).await;
        let carrier = match fetched {
            Ok(Ok(carrier)) => carrier,
            Ok(Err(source)) => {
                return Err(ValidationFailure::FetchFailed {
                    name: name.clone(),
                    source,
                })
            }
            Err(_elapsed) => {
                return Err(ValidationFailure::FetchFailed {
                    name: name.clone(),
                    source: FetchError::Timeout,
                })
            }
        };

        let certificate = Certificate::from_data(&carrier).map_err(|source| {
            ValidationFailure::MalformedCertificate {
                name: name.clone(),
                source,
            }
        })?;

        let now = self.clock.now();
        if certificate.is_too_early(now) {
            return Err(ValidationFailure::CertificateNotYetValid {
                name: certificate.name,
            });
        }
        if certificate.is_too_late(now) {
            return Err(ValidationFailure::CertificateExpired {
                name: certificate.name,
            });
        }

        // The certificate itself re-enters policy evaluation with the
        // smaller budget.
        self.validate_inner(SignedItem::Data(carrier), steps_remaining)
            .await?;
        Ok(certificate)
    }

    async fn verify_item(
        &self,
        item: &SignedItem,
        certificate: &Certificate,
    ) -> Result<(), ValidationFailure> {
        let signed = item.signed_portion();
        let verified = self
            .verifier
            .verify(
                &signed,
                &item.signature().signature,
                certificate.key.key_type,
                &certificate.key.key_bits,
            )
            .await;
        match verified {
            Ok(true) => Ok(()),
            Ok(false) => Err(ValidationFailure::SignatureMismatch {
                name: item.name().clone(),
                reason: format!("signature does not match key {}", certificate.name),
            }),
            Err(source) => Err(ValidationFailure::SignatureMismatch {
                name: item.name().clone(),
                reason: source.to_string(),
            }),
        }
    }
}
