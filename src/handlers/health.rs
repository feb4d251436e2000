use std::path::Path;

use salvo::prelude::*;

use crate::config::APP_NAME;
use crate::error::AppError;

use super::helpers::get_state;

/// GET /health - Health check
#[handler]
pub async fn health(res: &mut Response) {
    res.render(Json(serde_json::json!({
        "status": "healthy",
        "service": APP_NAME
    })));
}

/// GET / - Browser test page
#[handler]
pub async fn index(depot: &mut Depot, res: &mut Response) {
    let page = match get_state(depot) {
        Ok(state) => Path::new(&state.config.static_dir).join("index.html"),
        Err(e) => return e.render(res),
    };

    match tokio::fs::read_to_string(&page).await {
        Ok(html) => res.render(Text::Html(html)),
        Err(e) => {
            tracing::warn!("UI page {:?} unavailable: {}", page, e);
            AppError::NotFound(format!("UI file ({}) not found", page.display())).render(res);
        }
    }
}
