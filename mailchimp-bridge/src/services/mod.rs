//! Resource handlers
//!
//! Every mutating operation follows the same sequence: validate, persist
//! locally, call MailChimp, reconcile the remote id, persist again. A failed
//! MailChimp call leaves the local write in place and is reported to the
//! caller; there is no compensation and no retry.

pub mod lists;
pub mod members;

pub use lists::ListService;
pub use members::MemberService;

use mailchimp_client::RemoteCallError;
use shared::models::MailChimpEntity;

use crate::error::ServiceError;

/// Log a MailChimp failure that happened after the local commit
pub(crate) fn remote_failed<E: MailChimpEntity>(entity: &E, err: RemoteCallError) -> ServiceError {
    tracing::warn!(
        kind = E::KIND,
        id = entity.id().unwrap_or_default(),
        status = err.status(),
        timeout = err.is_timeout(),
        error = %err,
        "MailChimp call failed, local state kept"
    );
    err.into()
}
