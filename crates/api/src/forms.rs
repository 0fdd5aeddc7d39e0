// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submitted forms and their validated inputs.
//!
//! Each form has one input type. Field rules are declared as data in
//! `rollcall_domain` and checked in one pass, so a rejected submission
//! reports every failing field at once.

use std::collections::HashMap;

use rollcall_domain::{
    DocumentKind, EMPLOYEE_FIELDS, FieldErrors, FieldRule, FieldDef, LOCATION_FIELDS,
    SUPERVISOR_FIELDS, normalize_location_name, parse_iso_date, validate_fields,
};
use rollcall_persistence::{PersonProfile, SupervisorProfile};

/// Message shown for a document with a disallowed extension.
pub const IMAGES_ONLY: &str = "Images only!";

/// Fields whose values are compared in uppercase.
const UPPERCASE_FIELDS: [&str; 2] = ["pan_no", "ifsc"];

/// Admin-only assignment fields on the employee edit form.
const ASSIGNMENT_FIELDS: &[FieldDef] = &[
    FieldDef {
        name: "supervisor_id",
        rules: &[FieldRule::Required, FieldRule::Integer],
    },
    FieldDef {
        name: "location_id",
        rules: &[FieldRule::Required, FieldRule::Integer],
    },
];

/// A file part of a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The client-supplied file name.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// An empty file input: no name or no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_name.trim().is_empty() || self.bytes.is_empty()
    }
}

/// Text fields and files of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl SubmittedForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a form from text fields only.
    #[must_use]
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            files: HashMap::new(),
        }
    }

    /// Sets a text field. A repeated name keeps the last value.
    pub fn insert_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.files.insert(name.into(), file);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A trimmed, non-empty text value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    /// Uppercases identity numbers that are only valid in uppercase.
    fn normalize_identity_numbers(&mut self) {
        for name in UPPERCASE_FIELDS {
            if let Some(value) = self.fields.get_mut(name) {
                *value = value.trim().to_uppercase();
            }
        }
    }

    fn owned(&self, name: &str) -> String {
        self.value(name).unwrap_or_default().to_string()
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.value(name).map(ToString::to_string)
    }

    fn integer(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(|v| v.parse().ok())
    }
}

/// The non-empty document uploads of a form.
///
/// # Errors
///
/// Returns `Images only!` against every document field whose file has a
/// disallowed extension.
pub fn collect_documents(
    form: &SubmittedForm,
) -> Result<Vec<(DocumentKind, &UploadedFile)>, FieldErrors> {
    let mut errors: FieldErrors = FieldErrors::new();
    let mut documents: Vec<(DocumentKind, &UploadedFile)> = Vec::new();

    for kind in DocumentKind::ALL {
        let Some(file) = form.file(kind.field_name()) else {
            continue;
        };
        if file.is_empty() {
            continue;
        }
        if DocumentKind::accepts(&file.file_name) {
            documents.push((kind, file));
        } else {
            errors.add(kind.field_name(), IMAGES_ONLY);
        }
    }

    errors.into_result().map(|()| documents)
}

/// Reads the shared profile fields. Only call after the field rules passed.
fn person_from(form: &SubmittedForm) -> Result<PersonProfile, FieldErrors> {
    let mut errors: FieldErrors = FieldErrors::new();
    let mut date = |name: &str| match form.value(name).map(parse_iso_date) {
        Some(Ok(date)) => Some(date),
        _ => {
            errors.add(name, "Not a valid date value.");
            None
        }
    };
    let dob = date("dob");
    let doj = date("doj");

    match (dob, doj) {
        (Some(dob), Some(doj)) => Ok(PersonProfile {
            first_name: form.owned("first_name"),
            middle_name: form.optional("middle_name"),
            last_name: form.owned("last_name"),
            dob,
            doj,
            phone: form.owned("phone"),
            employee_code: form.owned("employee_code"),
            designation: form.owned("designation"),
            aadhaar_no: form.owned("aadhaar_no"),
            pan_no: form.owned("pan_no"),
            account_number: form.owned("account_number"),
            ifsc: form.owned("ifsc"),
            bank_name: form.owned("bank_name"),
            current_address: form.owned("current_address"),
            permanent_address: form.owned("permanent_address"),
        }),
        _ => Err(errors),
    }
}

/// Validated location form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInput {
    pub name: String,
}

impl LocationInput {
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn parse(form: &SubmittedForm) -> Result<Self, FieldErrors> {
        validate_fields(LOCATION_FIELDS, |name| form.get(name))?;

        let name: String = normalize_location_name(form.get("name").unwrap_or_default())
            .map_err(|e| {
                let mut errors: FieldErrors = FieldErrors::new();
                errors.add("name", e.to_string());
                errors
            })?;
        Ok(Self { name })
    }
}

/// Validated supervisor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorInput {
    pub login_name: String,
    /// A new password, when one was entered.
    pub password: Option<String>,
    pub profile: SupervisorProfile,
}

impl SupervisorInput {
    /// Validates a supervisor form.
    ///
    /// # Arguments
    ///
    /// * `form` - The submission; PAN and IFSC are uppercased in place
    /// * `password_required` - Whether an empty password is a failure
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn parse(form: &mut SubmittedForm, password_required: bool) -> Result<Self, FieldErrors> {
        form.normalize_identity_numbers();

        let mut errors: FieldErrors = validate_fields(SUPERVISOR_FIELDS, |name| form.get(name))
            .err()
            .unwrap_or_default();
        let password: Option<String> = form
            .get("password")
            .filter(|p| !p.is_empty())
            .map(String::from);
        if password_required && password.is_none() {
            errors.add("password", "This field is required.");
        }
        errors.into_result()?;

        Ok(Self {
            login_name: form.owned("username"),
            password,
            profile: SupervisorProfile {
                location_id: form.integer("location_id").unwrap_or_default(),
                esic_no: form.optional("esic_no"),
                uan_no: form.optional("uan_no"),
                person: person_from(form)?,
            },
        })
    }
}

/// Validated employee form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeInput {
    pub person: PersonProfile,
    /// Present only on the admin edit form.
    pub assignment: Option<EmployeeAssignment>,
}

/// Supervisor and location chosen by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeAssignment {
    pub supervisor_id: i64,
    pub location_id: i64,
}

impl EmployeeInput {
    /// Validates an employee form.
    ///
    /// # Arguments
    ///
    /// * `form` - The submission; PAN and IFSC are uppercased in place
    /// * `with_assignment` - Whether supervisor and location selects are
    ///   part of the form
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn parse(form: &mut SubmittedForm, with_assignment: bool) -> Result<Self, FieldErrors> {
        form.normalize_identity_numbers();

        let mut errors: FieldErrors = validate_fields(EMPLOYEE_FIELDS, |name| form.get(name))
            .err()
            .unwrap_or_default();
        let assignment_errors: Option<FieldErrors> = if with_assignment {
            validate_fields(ASSIGNMENT_FIELDS, |name| form.get(name)).err()
        } else {
            None
        };
        if let Some(assignment_errors) = assignment_errors {
            errors.merge(assignment_errors);
        }
        errors.into_result()?;

        let assignment: Option<EmployeeAssignment> = if with_assignment {
            Some(EmployeeAssignment {
                supervisor_id: form.integer("supervisor_id").unwrap_or_default(),
                location_id: form.integer("location_id").unwrap_or_default(),
            })
        } else {
            None
        };

        Ok(Self {
            person: person_from(form)?,
            assignment,
        })
    }
}
