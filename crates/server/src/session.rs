//! Cookie-backed session and one-shot flash notices.
//!
//! The session carries exactly one value: the last-posted display name. It
//! is set on every successful post and never explicitly cleared (there is
//! no logout). The flash cookie is queued by a handler and consumed by the
//! next rendered page.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const USERNAME_COOKIE: &str = "username";
pub const FLASH_COOKIE: &str = "flash";

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// The display name the session currently impersonates, if any.
pub fn current_username(jar: &CookieJar) -> Option<String> {
    jar.get(USERNAME_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Remember the last-posted name. Overwrites any previous value.
pub fn remember_username(jar: CookieJar, name: &str) -> CookieJar {
    jar.add(session_cookie(USERNAME_COOKIE, name.to_string()))
}

/// Queue a one-shot notice for the next rendered page.
pub fn flash(jar: CookieJar, message: &str) -> CookieJar {
    jar.add(session_cookie(FLASH_COOKIE, message.to_string()))
}

/// Consume the queued notice, clearing it from the client.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());
    let jar = if message.is_some() {
        // removal must match the path the cookie was set with
        let mut removal = Cookie::from(FLASH_COOKIE);
        removal.set_path("/");
        jar.remove(removal)
    } else {
        jar
    };
    (jar, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_round_trip() {
        let jar = CookieJar::new();
        assert_eq!(current_username(&jar), None);
        let jar = remember_username(jar, "Kamran Arbaz");
        assert_eq!(current_username(&jar).as_deref(), Some("Kamran Arbaz"));
        // a later post under a different name overwrites
        let jar = remember_username(jar, "Drishya CM");
        assert_eq!(current_username(&jar).as_deref(), Some("Drishya CM"));
    }

    #[test]
    fn flash_is_one_shot() {
        let jar = flash(CookieJar::new(), "Update posted.");
        let (jar, msg) = take_flash(jar);
        assert_eq!(msg.as_deref(), Some("Update posted."));
        // consumed: the jar now carries a removal cookie, not a value
        let (_, again) = take_flash(jar);
        assert_eq!(again, None);
    }
}
