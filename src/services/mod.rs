use std::future::Future;

use sea_orm::{DbErr, SqlErr};

use crate::error::{AppError, AppResult};

pub mod customer_service;
pub mod order_service;
pub mod product_service;

/// Resolve the outcome of an update that may have raced another writer.
///
/// `RecordNotUpdated` means the row matched nothing at save time. It is
/// re-checked once: a row that is gone becomes `gone`, a row that still
/// exists is a genuine conflict and stays fatal.
pub(crate) async fn settle_update<T, F, Fut>(
    result: AppResult<T>,
    still_exists: F,
    gone: AppError,
) -> AppResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool, DbErr>>,
{
    match result {
        Err(AppError::OrmError(DbErr::RecordNotUpdated)) => {
            if still_exists().await? {
                tracing::warn!("update matched no row although the record exists");
                Err(AppError::OrmError(DbErr::RecordNotUpdated))
            } else {
                Err(gone)
            }
        }
        other => other,
    }
}

/// Resolve a failed insert: a key collision is a conflict, anything else is fatal.
pub(crate) async fn settle_insert<T, F, Fut>(
    result: Result<T, DbErr>,
    already_exists: F,
    entity: &str,
) -> AppResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool, DbErr>>,
{
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            let duplicate = matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
                || already_exists().await?;
            if duplicate {
                tracing::warn!(entity = %entity, "insert rejected, id already taken");
                Err(AppError::Conflict(format!("{entity} already exists")))
            } else {
                Err(err.into())
            }
        }
    }
}

/// Deleting a row that something still points at is a conflict, not a crash.
pub(crate) fn delete_error(err: DbErr, entity: &str) -> AppError {
    if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) {
        AppError::Conflict(format!("{entity} is still referenced"))
    } else {
        err.into()
    }
}
