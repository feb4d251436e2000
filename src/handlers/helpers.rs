use salvo::prelude::*;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn get_state(depot: &Depot) -> AppResult<&AppState> {
    depot
        .obtain::<AppState>()
        .map_err(|_| AppError::Internal("application state not configured".to_string()))
}

/// Render a handler result: JSON body on success, error envelope otherwise.
pub(crate) fn respond<T>(res: &mut Response, result: AppResult<T>)
where
    T: Serialize + Send,
{
    match result {
        Ok(body) => res.render(Json(body)),
        Err(e) => e.render(res),
    }
}
