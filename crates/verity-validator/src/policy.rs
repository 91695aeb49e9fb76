//! Pluggable trust policies.

use crate::error::ValidationFailure;
use crate::request::CertificateRequirement;
use async_trait::async_trait;
use std::collections::HashSet;
use verity_core::{Name, SignedItem};

/// What a policy decided about one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Trust the item as-is. Terminal.
    Accept,
    /// Refuse the item. Terminal.
    Reject(ValidationFailure),
    /// The listed certificates must be fetched and validated, and the
    /// item's signature verified against them, before the item can be
    /// trusted.
    Escalate(Vec<CertificateRequirement>),
}

/// The decision function specializing the engine to one trust policy.
///
/// Exactly one of accept, reject, or escalate per item. Policies see the
/// remaining step budget but must not enforce it themselves; the engine
/// owns the bound.
#[async_trait]
pub trait ValidationPolicy: Send + Sync {
    /// Classify `item`.
    async fn check_policy(&self, item: &SignedItem, steps_remaining: u32) -> PolicyDecision;
}

/// The reference policy: accepts every item unconditionally.
///
/// Never escalates and never rejects. Useful for tests and for
/// trust-agnostic operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllPolicy;

#[async_trait]
impl ValidationPolicy for AcceptAllPolicy {
    async fn check_policy(&self, _item: &SignedItem, _steps_remaining: u32) -> PolicyDecision {
        PolicyDecision::Accept
    }
}

/// A hierarchical policy anchored at a fixed set of certificate names.
///
/// An item whose own name is an anchor is accepted outright; anything else
/// escalates to the certificate its key locator names. Verification against
/// the escalated certificate is the engine's job.
#[derive(Debug, Clone, Default)]
pub struct TrustAnchorPolicy {
    anchors: HashSet<Name>,
}

impl TrustAnchorPolicy {
    /// A policy trusting the given certificate names as anchors.
    pub fn new(anchors: impl IntoIterator<Item = Name>) -> Self {
        Self {
            anchors: anchors.into_iter().collect(),
        }
    }

    /// True if `name` is one of the configured anchors.
    pub fn is_anchor(&self, name: &Name) -> bool {
        self.anchors.contains(name)
    }
}

#[async_trait]
impl ValidationPolicy for TrustAnchorPolicy {
    async fn check_policy(&self, item: &SignedItem, _steps_remaining: u32) -> PolicyDecision {
        if self.is_anchor(item.name()) {
            return PolicyDecision::Accept;
        }
        let key_locator = &item.signature().key_locator;
        if key_locator.is_empty() {
            return PolicyDecision::Reject(ValidationFailure::PolicyRejected {
                reason: format!("{} has no key locator", item.name()),
            });
        }
        PolicyDecision::Escalate(vec![CertificateRequirement::new(key_locator.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_core::{SignatureInfo, SignedData};

    fn item(name: &str, key_locator: &str) -> SignedItem {
        SignedItem::Data(SignedData {
            name: Name::from(name),
            content: Vec::new(),
            signature: SignatureInfo {
                key_locator: Name::from(key_locator),
                signature: vec![0; 64],
            },
        })
    }

    #[tokio::test]
    async fn accept_all_accepts() {
        let decision = AcceptAllPolicy
            .check_policy(&item("/anything", "/any/KEY1/ID-CERT/1"), 0)
            .await;
        assert_eq!(decision, PolicyDecision::Accept);
    }

    #[tokio::test]
    async fn anchor_policy_accepts_anchor() {
        let policy = TrustAnchorPolicy::new([Name::from("/root/KEY0/ID-CERT/1")]);
        let decision = policy
            .check_policy(&item("/root/KEY0/ID-CERT/1", "/root/KEY0/ID-CERT/1"), 5)
            .await;
        assert_eq!(decision, PolicyDecision::Accept);
    }

    #[tokio::test]
    async fn anchor_policy_escalates_to_key_locator() {
        let policy = TrustAnchorPolicy::new([Name::from("/root/KEY0/ID-CERT/1")]);
        let decision = policy
            .check_policy(&item("/alice/doc", "/alice/KEY1/ID-CERT/1"), 5)
            .await;
        assert_eq!(
            decision,
            PolicyDecision::Escalate(vec![CertificateRequirement::new(Name::from(
                "/alice/KEY1/ID-CERT/1"
            ))])
        );
    }

    #[tokio::test]
    async fn anchor_policy_rejects_missing_key_locator() {
        let policy = TrustAnchorPolicy::new([]);
        let decision = policy.check_policy(&item("/alice/doc", ""), 5).await;
        assert!(matches!(
            decision,
            PolicyDecision::Reject(ValidationFailure::PolicyRejected { .. })
        ));
    }
}
