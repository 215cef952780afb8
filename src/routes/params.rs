use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Optional paging for list endpoints. Without `page` and `per_page` the
/// whole collection is returned.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    /// `(page, per_page, offset)` when paging was requested. A page whose
    /// offset does not fit in an `i64` is a bad request.
    pub fn window(&self) -> AppResult<Option<(i64, i64, i64)>> {
        if self.page.is_none() && self.per_page.is_none() {
            return Ok(None);
        }
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| AppError::BadRequest(format!("page {page} is out of range")))?;
        Ok(Some((page, per_page, offset)))
    }
}
