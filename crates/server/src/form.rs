// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Form body extraction.
//!
//! Accepts `multipart/form-data` (text fields plus file uploads) and
//! `application/x-www-form-urlencoded` bodies alike.

use axum::{
    Form,
    extract::{FromRequest, Multipart, Request},
    http::{StatusCode, header},
};
use rollcall_api::{SubmittedForm, UploadedFile};
use tracing::{debug, warn};

use crate::response::HttpError;

/// A submitted form body.
pub struct FormData(pub SubmittedForm);

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| {
                    warn!(error = %e, "Unreadable form body");
                    HttpError::new(StatusCode::BAD_REQUEST, e.body_text())
                })?;
            return Ok(Self(SubmittedForm::from_fields(pairs)));
        }

        let mut multipart: Multipart = Multipart::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "Unreadable multipart body");
            HttpError::new(StatusCode::BAD_REQUEST, e.body_text())
        })?;

        let mut form: SubmittedForm = SubmittedForm::new();
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!(error = %e, "Multipart field could not be read");
            HttpError::new(e.status(), e.body_text())
        })? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(ToString::to_string) {
                let bytes = field.bytes().await.map_err(|e| {
                    warn!(field = %name, error = %e, "Upload could not be read");
                    HttpError::new(e.status(), e.body_text())
                })?;
                debug!(field = %name, file_name = %file_name, size = bytes.len(), "Received upload");
                form.insert_file(
                    name,
                    UploadedFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                let value: String = field.text().await.map_err(|e| {
                    warn!(field = %name, error = %e, "Form field could not be read");
                    HttpError::new(e.status(), e.body_text())
                })?;
                form.insert_field(name, value);
            }
        }

        Ok(Self(form))
    }
}
