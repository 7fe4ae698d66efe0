//! Ownership checks gating mutations on business accounts and user accounts.

use thiserror::Error;

use crate::store::{BusinessAccountStore, StoreError};

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("subject {subject_id} may not act on {resource_id}")]
    Forbidden {
        subject_id: String,
        resource_id: String,
    },

    #[error("ownership could not be determined: {0}")]
    StoreError(#[from] StoreError),
}

/// Succeeds only when an ownership row links the subject to the business
/// account. A store failure is reported as such, never as a denial.
pub async fn ensure_business_owner(
    store: &dyn BusinessAccountStore,
    subject_id: &str,
    resource_id: &str,
) -> Result<(), AuthzError> {
    if store.is_owner(resource_id, subject_id).await? {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %subject_id,
            business_account_id = %resource_id,
            "Business account access denied"
        );
        Err(AuthzError::Forbidden {
            subject_id: subject_id.to_string(),
            resource_id: resource_id.to_string(),
        })
    }
}

/// Self-service endpoints: the path id must be the authenticated subject.
pub fn ensure_self(subject_id: &str, target_user_id: &str) -> Result<(), AuthzError> {
    if subject_id == target_user_id {
        Ok(())
    } else {
        tracing::warn!(user_id = %subject_id, target_user_id = %target_user_id, "User account access denied");
        Err(AuthzError::Forbidden {
            subject_id: subject_id.to_string(),
            resource_id: target_user_id.to_string(),
        })
    }
}
