// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Declarative form field rules.
//!
//! Each form is described by a static table of [`FieldDef`]s. Validation
//! walks the table against submitted values and collects every failure per
//! field so the page can show them inline.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::error::DomainError;
use crate::week::parse_iso_date;

/// Minimum length of a location name after trimming.
const LOCATION_NAME_MIN: usize = 2;
/// Maximum length of a location name after trimming.
const LOCATION_NAME_MAX: usize = 100;

const REQUIRED_MESSAGE: &str = "This field is required.";

/// A single constraint applied to a submitted field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// The trimmed value must be non-empty. Other rules are skipped for
    /// empty values whether or not the field is required.
    Required,
    /// Character count bounds, inclusive.
    Length { min: usize, max: usize },
    /// The value must fully match the pattern.
    Pattern {
        regex: &'static str,
        message: &'static str,
    },
    /// The value must be a `YYYY-MM-DD` calendar date.
    IsoDate,
    /// The value must be an integer identifier (select boxes).
    Integer,
}

/// A named field and the rules it must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub rules: &'static [FieldRule],
}

const fn required(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        rules: &[FieldRule::Required],
    }
}

const fn required_date(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        rules: &[FieldRule::Required, FieldRule::IsoDate],
    }
}

const fn required_choice(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        rules: &[FieldRule::Required, FieldRule::Integer],
    }
}

const PHONE: FieldDef = FieldDef {
    name: "phone",
    rules: &[
        FieldRule::Required,
        FieldRule::Pattern {
            regex: r"^\d{10}$",
            message: "Enter 10 digit phone number",
        },
    ],
};

const AADHAAR: FieldDef = FieldDef {
    name: "aadhaar_no",
    rules: &[
        FieldRule::Required,
        FieldRule::Pattern {
            regex: r"^\d{12}$",
            message: "Enter 12 digit Aadhaar number",
        },
    ],
};

const PAN: FieldDef = FieldDef {
    name: "pan_no",
    rules: &[
        FieldRule::Required,
        FieldRule::Pattern {
            regex: r"^[A-Z]{5}[0-9]{4}[A-Z]$",
            message: "Enter valid PAN number",
        },
    ],
};

const IFSC: FieldDef = FieldDef {
    name: "ifsc",
    rules: &[
        FieldRule::Required,
        FieldRule::Pattern {
            regex: r"^[A-Z]{4}0[A-Z0-9]{6}$",
            message: "Enter valid IFSC code",
        },
    ],
};

/// Location form.
pub const LOCATION_FIELDS: &[FieldDef] = &[FieldDef {
    name: "name",
    rules: &[
        FieldRule::Required,
        FieldRule::Length {
            min: LOCATION_NAME_MIN,
            max: LOCATION_NAME_MAX,
        },
    ],
}];

/// Supervisor profile form. The password is checked separately because it
/// is required on create and optional on edit.
pub const SUPERVISOR_FIELDS: &[FieldDef] = &[
    required("username"),
    required_choice("location_id"),
    required("first_name"),
    required("last_name"),
    required_date("dob"),
    required_date("doj"),
    PHONE,
    required("employee_code"),
    AADHAAR,
    PAN,
    required("designation"),
    required("account_number"),
    IFSC,
    required("bank_name"),
    required("current_address"),
    required("permanent_address"),
];

/// Employee profile form, shared by the admin and supervisor editors.
pub const EMPLOYEE_FIELDS: &[FieldDef] = &[
    required("first_name"),
    required("last_name"),
    required_date("dob"),
    required_date("doj"),
    PHONE,
    required("employee_code"),
    required("designation"),
    AADHAAR,
    PAN,
    required("account_number"),
    IFSC,
    required("bank_name"),
    required("current_address"),
    required("permanent_address"),
];

/// Per-field validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Appends all failures from another set.
    pub fn merge(&mut self, other: Self) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Converts into `Err(self)` when any failure was recorded.
    ///
    /// # Errors
    ///
    /// Returns the collected failures if there are any.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

/// Checks one trimmed value against one rule.
fn check_rule(rule: &FieldRule, value: &str) -> Option<String> {
    match rule {
        FieldRule::Required => None,
        FieldRule::Length { min, max } => {
            let len: usize = value.chars().count();
            (len < *min || len > *max)
                .then(|| format!("Field must be between {min} and {max} characters long."))
        }
        FieldRule::Pattern { regex, message } => match Regex::new(regex) {
            Ok(re) => (!re.is_match(value)).then(|| (*message).to_string()),
            Err(e) => Some(format!("Invalid validation pattern: {e}")),
        },
        FieldRule::IsoDate => parse_iso_date(value)
            .err()
            .map(|_| String::from("Not a valid date value.")),
        FieldRule::Integer => value
            .parse::<i64>()
            .err()
            .map(|_| String::from("Not a valid choice.")),
    }
}

/// Validates submitted values against a rule table.
///
/// # Arguments
///
/// * `defs` - The form's field table
/// * `lookup` - Returns the submitted value for a field name, if any
///
/// # Errors
///
/// Returns every failure found, grouped by field.
pub fn validate_fields<'a, F>(defs: &[FieldDef], lookup: F) -> Result<(), FieldErrors>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut errors: FieldErrors = FieldErrors::new();

    for def in defs {
        let value: &str = lookup(def.name).map_or("", str::trim);

        if value.is_empty() {
            if def.rules.contains(&FieldRule::Required) {
                errors.add(def.name, REQUIRED_MESSAGE);
            }
            continue;
        }

        for rule in def.rules {
            if let Some(message) = check_rule(rule, value) {
                errors.add(def.name, message);
            }
        }
    }

    errors.into_result()
}

/// Trims a location name and checks its length.
///
/// # Errors
///
/// Returns `DomainError::InvalidLocationName` if the trimmed name is shorter
/// than 2 or longer than 100 characters.
pub fn normalize_location_name(raw: &str) -> Result<String, DomainError> {
    let name: &str = raw.trim();
    let len: usize = name.chars().count();

    if !(LOCATION_NAME_MIN..=LOCATION_NAME_MAX).contains(&len) {
        return Err(DomainError::InvalidLocationName(format!(
            "must be between {LOCATION_NAME_MIN} and {LOCATION_NAME_MAX} characters, got {len}"
        )));
    }

    Ok(name.to_string())
}
