use salvo::prelude::*;

use super::helpers::{get_state, respond};

/// GET /v1/models - List the configured models
#[handler]
pub async fn list_models(depot: &mut Depot, res: &mut Response) {
    let result = get_state(depot).map(|state| state.service.models());
    respond(res, result);
}

/// GET /api/languages - Language table used by the test page
#[handler]
pub async fn list_languages(depot: &mut Depot, res: &mut Response) {
    let result = get_state(depot).map(|state| state.service.languages());
    respond(res, result);
}
