use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::auth::jwt;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {}

pub async fn login_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    // If already logged in, go straight to the admin panel
    if let Some(cookie) = jar.get("access_token") {
        if jwt::decode_token(cookie.value(), &state.config.jwt_secret).is_ok() {
            return Redirect::to("/admin").into_response();
        }
    }

    let template = LoginTemplate {};
    Html(template.render().unwrap_or_default()).into_response()
}
