use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;

use crate::config::CookieConfig;

/// Attach the session cookie carrying `token`.
///
/// Max-Age matches the token lifetime so the browser drops the cookie when
/// the session expires.
pub fn with_session(
    jar: CookieJar,
    config: &CookieConfig,
    token: String,
    lifetime_hours: i64,
) -> CookieJar {
    let cookie = Cookie::build((config.name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::from(config.same_site))
        .max_age(time::Duration::hours(lifetime_hours));

    jar.add(cookie)
}

/// Expire the session cookie on the client.
pub fn without_session(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    jar.remove(Cookie::build(config.name.clone()).path("/"))
}

/// Session token sent by the client, if any.
pub fn session_token(jar: &CookieJar, config: &CookieConfig) -> Option<String> {
    jar.get(&config.name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}
