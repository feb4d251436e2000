use salvo::cors::*;
use salvo::prelude::*;
use salvo::serve_static::StaticDir;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .hoop(affix_state::inject(state))
        .hoop(
            Cors::new()
                .allow_origin(AllowOrigin::any())
                .allow_methods(AllowMethods::any())
                .allow_headers(AllowHeaders::any())
                .into_handler(),
        )
        // Web UI
        .get(handlers::health::index)
        .push(Router::with_path("static/{**path}").get(StaticDir::new([static_dir])))
        .push(Router::with_path("health").get(handlers::health::health))
        // Authenticated API
        .push(
            Router::new()
                .hoop(handlers::auth::require_api_key)
                .push(Router::with_path("v1/chat/completions").post(handlers::chat::chat_completions))
                .push(Router::with_path("v1/models").get(handlers::models::list_models))
                .push(
                    Router::with_path("api/generate-from-upload")
                        .post(handlers::upload::generate_from_upload),
                )
                .push(Router::with_path("api/languages").get(handlers::models::list_languages)),
        )
}
