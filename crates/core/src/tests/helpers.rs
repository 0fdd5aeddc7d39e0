// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rollcall_domain::AttendanceStatus;
use time::Date;

use crate::{LedgerEntry, RosterEntry};

pub fn roster_entry(employee_id: i64, name: &str) -> RosterEntry {
    RosterEntry {
        employee_id,
        display_name: name.to_string(),
        employee_code: format!("EMP-{employee_id:03}"),
    }
}

pub fn ledger_entry(
    employee_id: i64,
    date: Date,
    status: AttendanceStatus,
    overtime_hours: f64,
) -> LedgerEntry {
    LedgerEntry {
        employee_id,
        date,
        status,
        overtime_hours,
    }
}
