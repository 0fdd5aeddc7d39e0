// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `identities`: users and sessions
//! - `directory`: locations and supervisors
//! - `employees`: employee registry and rosters
//! - `attendance`: weekly ledger reads and the admin export
//! - `notifications`: notification log and dashboard counts
//!
//! Every query is generated in `_sqlite` and `_mysql` variants by
//! `backend_fn!`; `Persistence` in `lib.rs` dispatches to the one
//! matching its connection.

pub mod attendance;
pub mod directory;
pub mod employees;
pub mod identities;
pub mod notifications;

/// Builds a `LIKE` pattern matching `term` anywhere, with `%`, `_`, and
/// `\` escaped. Use with `.escape('\\')`.
///
/// `LIKE` is case-insensitive for ASCII on `SQLite` and under the default
/// `MySQL` collations.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern: String = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
