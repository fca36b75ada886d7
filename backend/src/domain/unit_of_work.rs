//! Scoped unit-of-work helper.
//!
//! [`within_unit_of_work`] opens a unit of work, runs the supplied operation
//! against it, commits when the operation succeeds, and rolls back when it
//! fails. Staged mutations are therefore never left pending on any exit
//! path, including early returns through `?`.

use futures_util::future::BoxFuture;
use tracing::warn;

use super::ports::{PoiStore, PoiStoreError, PoiUnitOfWork};

/// Run `operation` inside a fresh unit of work.
///
/// The operation's error type must absorb store failures so that commit and
/// begin errors can be surfaced through the same channel. A rollback failure
/// after an operation error is logged and the operation's error is returned.
///
/// # Examples
/// ```rust,no_run
/// # use poi_backend::domain::ports::{PoiStore, PoiStoreError};
/// # use poi_backend::domain::{within_unit_of_work, PoiId};
/// # async fn example(store: &dyn PoiStore, id: PoiId) -> Result<(), PoiStoreError> {
/// within_unit_of_work(store, |uow| {
///     Box::pin(async move { uow.mark_removed(&id).await })
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn within_unit_of_work<S, T, E, F>(store: &S, operation: F) -> Result<T, E>
where
    S: PoiStore + ?Sized,
    T: Send,
    E: From<PoiStoreError> + Send,
    F: for<'u> FnOnce(&'u mut dyn PoiUnitOfWork) -> BoxFuture<'u, Result<T, E>> + Send,
{
    let mut uow = store.begin_unit_of_work().await?;
    match operation(uow.as_mut()).await {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "unit of work rollback failed");
            }
            Err(err)
        }
    }
}
