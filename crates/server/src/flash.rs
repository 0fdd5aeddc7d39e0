// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One-shot flash messages carried in a cookie across a redirect.
//!
//! Actions queue flashes with [`push`]; the next rendered page drains
//! them with [`take`].

use rollcall_api::Flash;
use tower_cookies::{Cookie, Cookies};
use tracing::warn;

const FLASH_COOKIE_NAME: &str = "_flash";

/// Reads the queued flashes without consuming them.
fn pending(cookies: &Cookies) -> Vec<Flash> {
    cookies
        .get(FLASH_COOKIE_NAME)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

/// Queues a flash for the next page.
pub fn push(cookies: &Cookies, flash: Flash) {
    let mut flashes: Vec<Flash> = pending(cookies);
    flashes.push(flash);

    match serde_json::to_string(&flashes) {
        Ok(value) => {
            let mut cookie: Cookie<'static> = Cookie::new(FLASH_COOKIE_NAME, value);
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookies.add(cookie);
        }
        Err(e) => warn!(error = %e, "Dropping unserializable flash"),
    }
}

/// Drains the queued flashes.
pub fn take(cookies: &Cookies) -> Vec<Flash> {
    let flashes: Vec<Flash> = pending(cookies);
    if cookies.get(FLASH_COOKIE_NAME).is_some() {
        cookies.remove(Cookie::build((FLASH_COOKIE_NAME, "")).path("/").build());
    }
    flashes
}
