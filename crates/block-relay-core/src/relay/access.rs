use alloy_primitives::Address;
use tracing::warn;

use super::RelayError;

/// Holds the single identity allowed to mutate the store.
///
/// The submitter is fixed at construction. Replacing it means deploying a new
/// relay version and migrating through [`super::RelayProxy::upgrade`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessGuard {
    submitter: Address,
}

impl AccessGuard {
    pub fn new(submitter: Address) -> Self {
        Self { submitter }
    }

    pub fn submitter(&self) -> Address {
        self.submitter
    }

    /// Fail with `Unauthorized` unless `caller` is the submitter.
    pub fn authorize(&self, caller: &Address) -> Result<(), RelayError> {
        if *caller != self.submitter {
            warn!(%caller, "rejected call from unauthorized identity");
            return Err(RelayError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    pub fn is_upgradable(&self, candidate: &Address) -> bool {
        *candidate == self.submitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_submitter_only() {
        let guard = AccessGuard::new(Address::repeat_byte(0x11));

        assert!(guard.authorize(&Address::repeat_byte(0x11)).is_ok());
        assert_eq!(
            guard.authorize(&Address::repeat_byte(0x22)),
            Err(RelayError::Unauthorized {
                caller: Address::repeat_byte(0x22)
            })
        );
    }

    #[test]
    fn test_is_upgradable() {
        let guard = AccessGuard::new(Address::repeat_byte(0x11));
        assert!(guard.is_upgradable(&Address::repeat_byte(0x11)));
        assert!(!guard.is_upgradable(&Address::ZERO));
    }
}
