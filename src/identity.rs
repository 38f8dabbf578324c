//! Identifier issuance and uniqueness checking.

use crate::error::ScoringError;
use std::collections::HashSet;
use uuid::Uuid;

/// Registry of identifiers in use.
///
/// Passed explicitly to whatever creates identified entities; there is no
/// process-wide registry.
///
/// # Examples
///
/// ```
/// use u_scorecard::IdRegistry;
///
/// let mut ids = IdRegistry::new();
/// ids.claim("cfg-2016").unwrap();
/// assert!(ids.claim("cfg-2016").is_err());
///
/// let fresh = ids.issue();
/// assert!(ids.contains(&fresh));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdRegistry {
    ids: HashSet<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh identifier and records it as in use.
    pub fn issue(&mut self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.ids.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Records `id` as in use.
    ///
    /// Fails with [`ScoringError::MissingRequiredField`] for an empty id and
    /// [`ScoringError::DuplicateIdentifier`] if it was already claimed.
    pub fn claim(&mut self, id: impl Into<String>) -> Result<(), ScoringError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ScoringError::MissingRequiredField("id"));
        }
        if self.ids.contains(&id) {
            return Err(ScoringError::DuplicateIdentifier { id });
        }
        self.ids.insert(id);
        Ok(())
    }

    /// Returns `true` if `id` is in use.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Releases `id`, returning whether it was in use.
    pub fn release(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_is_unique() {
        let mut ids = IdRegistry::new();
        let a = ids.issue();
        let b = ids.issue();
        assert_ne!(a, b);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_claim_rejects_duplicates() {
        let mut ids = IdRegistry::new();
        ids.claim("x").unwrap();
        assert_eq!(
            ids.claim("x"),
            Err(ScoringError::DuplicateIdentifier { id: "x".into() })
        );
    }

    #[test]
    fn test_claim_rejects_empty() {
        let mut ids = IdRegistry::new();
        assert_eq!(ids.claim(""), Err(ScoringError::MissingRequiredField("id")));
        assert!(ids.is_empty());
    }

    #[test]
    fn test_release_allows_reclaim() {
        let mut ids = IdRegistry::new();
        ids.claim("x").unwrap();
        assert!(ids.release("x"));
        assert!(!ids.contains("x"));
        assert!(ids.claim("x").is_ok());
    }
}
