//! Credential authorization against the lane allow list.
//!
//! Authorization is a whole-value membership test: a presented credential is
//! authorized when it is byte-for-byte equal to one of the allow-list entries.
//! There is no prefix matching and no wildcard form; a tag that differs in a
//! single byte is rejected.

use boomgate_core::CredentialId;
use subtle::{Choice, ConstantTimeEq};

use crate::error::{Error, Result};

/// Set of credentials authorized to open the gate.
///
/// Every membership check compares the candidate against *all* entries in
/// constant time, so the check's duration reveals neither the matching entry
/// nor the position of the first differing byte.
///
/// # Examples
///
/// ```
/// use boomgate_control::AllowList;
/// use boomgate_core::CredentialId;
///
/// let list = AllowList::new(vec![CredentialId::new([0x03, 0x0C, 0x49, 0x16])]).unwrap();
///
/// assert!(list.is_authorized(&CredentialId::new([0x03, 0x0C, 0x49, 0x16])));
/// assert!(!list.is_authorized(&CredentialId::new([0x03, 0x0C, 0x49, 0x17])));
/// ```
#[derive(Debug, Clone)]
pub struct AllowList {
    entries: Vec<CredentialId>,
}

impl AllowList {
    /// Create an allow list from the given entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAllowList`] if `entries` is empty. A lane with
    /// nothing on its allow list could never open and is a configuration
    /// mistake, not a valid deployment.
    pub fn new(entries: Vec<CredentialId>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyAllowList);
        }
        Ok(Self { entries })
    }

    /// Check whether `candidate` is authorized to open the gate.
    ///
    /// The comparison visits every entry and accumulates the match bit,
    /// so the duration does not depend on which entry (if any) matched.
    #[must_use]
    pub fn is_authorized(&self, candidate: &CredentialId) -> bool {
        let mut matched = Choice::from(0u8);
        for entry in &self.entries {
            matched |= entry
                .as_bytes()
                .as_slice()
                .ct_eq(candidate.as_bytes().as_slice());
        }
        matched.into()
    }

    /// Number of entries on the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries. Always `false` for a constructed
    /// list; present for slice-like API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries on the list, in configuration order.
    #[must_use]
    pub fn entries(&self) -> &[CredentialId] {
        &self.entries
    }
}

impl Default for AllowList {
    /// Allow list holding only the shipped pilot credential.
    fn default() -> Self {
        Self {
            entries: vec![CredentialId::new(
                boomgate_core::constants::DEFAULT_AUTHORIZED_CREDENTIAL,
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pilot_list() -> AllowList {
        AllowList::new(vec![CredentialId::new([0x03, 0x0C, 0x49, 0x16])]).unwrap()
    }

    #[test]
    fn test_empty_list_rejected() {
        let result = AllowList::new(vec![]);
        assert!(matches!(result, Err(Error::EmptyAllowList)));
    }

    #[test]
    fn test_exact_match_authorized() {
        let list = pilot_list();
        assert!(list.is_authorized(&CredentialId::new([0x03, 0x0C, 0x49, 0x16])));
    }

    #[rstest]
    #[case([0x04, 0x0C, 0x49, 0x16])]
    #[case([0x03, 0x0D, 0x49, 0x16])]
    #[case([0x03, 0x0C, 0x4A, 0x16])]
    #[case([0x03, 0x0C, 0x49, 0x17])]
    #[case([0x16, 0x49, 0x0C, 0x03])]
    #[case([0x00, 0x00, 0x00, 0x00])]
    #[case([0xFF, 0xFF, 0xFF, 0xFF])]
    fn test_non_matching_rejected(#[case] bytes: [u8; 4]) {
        let list = pilot_list();
        assert!(!list.is_authorized(&CredentialId::new(bytes)));
    }

    #[test]
    fn test_every_single_byte_perturbation_rejected() {
        let list = pilot_list();
        let base: [u8; 4] = [0x03, 0x0C, 0x49, 0x16];

        for position in 0..4 {
            for delta in 1..=255u8 {
                let mut perturbed = base;
                perturbed[position] = perturbed[position].wrapping_add(delta);
                assert!(
                    !list.is_authorized(&CredentialId::new(perturbed)),
                    "perturbed byte {} by {} was wrongly authorized",
                    position,
                    delta
                );
            }
        }
    }

    #[test]
    fn test_multiple_entries_any_position_matches() {
        let list = AllowList::new(vec![
            CredentialId::new([0x01, 0x02, 0x03, 0x04]),
            CredentialId::new([0x03, 0x0C, 0x49, 0x16]),
            CredentialId::new([0xAA, 0xBB, 0xCC, 0xDD]),
        ])
        .unwrap();

        assert!(list.is_authorized(&CredentialId::new([0x01, 0x02, 0x03, 0x04])));
        assert!(list.is_authorized(&CredentialId::new([0x03, 0x0C, 0x49, 0x16])));
        assert!(list.is_authorized(&CredentialId::new([0xAA, 0xBB, 0xCC, 0xDD])));
        assert!(!list.is_authorized(&CredentialId::new([0x01, 0x02, 0x03, 0x05])));
    }

    #[test]
    fn test_default_list_holds_pilot_credential() {
        let list = AllowList::default();
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
        assert!(list.is_authorized(&CredentialId::new([0x03, 0x0C, 0x49, 0x16])));
    }

    #[test]
    fn test_entries_preserve_configuration_order() {
        let first = CredentialId::new([0x01, 0x02, 0x03, 0x04]);
        let second = CredentialId::new([0x05, 0x06, 0x07, 0x08]);
        let list = AllowList::new(vec![first, second]).unwrap();

        assert_eq!(list.entries(), &[first, second]);
    }
}
