// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests driven with `tower::ServiceExt::oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use rollcall_api::DocumentStore;
use rollcall_persistence::{DocumentPaths, Persistence, PersonProfile, SupervisorProfile};
use tempfile::TempDir;
use time::macros::date;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const ADMIN_PASSWORD: &str = "Admin#2026";
pub const SUPERVISOR_PASSWORD: &str = "Supervisor#2026";

const BOUNDARY: &str = "rollcall-test-boundary";

/// Text fields of a valid employee form.
pub const EMPLOYEE_FIELDS: [(&str, &str); 14] = [
    ("first_name", "Asha"),
    ("last_name", "Patil"),
    ("dob", "1991-02-03"),
    ("doj", "2025-06-01"),
    ("phone", "9123456780"),
    ("employee_code", "EMP-100"),
    ("designation", "Packer"),
    ("aadhaar_no", "567856785678"),
    ("pan_no", "PQRST6789K"),
    ("account_number", "998877665544"),
    ("ifsc", "HDFC0004321"),
    ("bank_name", "HDFC"),
    ("current_address", "4 Station Road"),
    ("permanent_address", "4 Station Road"),
];

/// A router over an in-memory database seeded with the `admin`
/// identity, the `Pune` location, and the supervisor `meena` there.
pub struct TestServer {
    pub app: Router,
    pub state: AppState,
    pub upload_dir: TempDir,
    pub location_id: i64,
    pub supervisor_id: i64,
}

pub fn test_person(first_name: &str, last_name: &str) -> PersonProfile {
    PersonProfile {
        first_name: first_name.to_string(),
        middle_name: None,
        last_name: last_name.to_string(),
        dob: date!(1990 - 05 - 17),
        doj: date!(2024 - 01 - 02),
        phone: String::from("9876543210"),
        employee_code: format!("EMP-{first_name}"),
        designation: String::from("Operator"),
        aadhaar_no: String::from("123412341234"),
        pan_no: String::from("ABCDE1234F"),
        account_number: String::from("001122334455"),
        ifsc: String::from("SBIN0001234"),
        bank_name: String::from("State Bank"),
        current_address: String::from("12 Mill Road"),
        permanent_address: String::from("12 Mill Road"),
    }
}

pub fn create_supervisor(persistence: &mut Persistence, login_name: &str, location_id: i64) -> i64 {
    let profile: SupervisorProfile = SupervisorProfile {
        location_id,
        esic_no: None,
        uan_no: None,
        person: test_person("Meena", "Rao"),
    };
    persistence
        .create_supervisor(
            login_name,
            SUPERVISOR_PASSWORD,
            &profile,
            &DocumentPaths::default(),
        )
        .unwrap()
}

pub fn setup_test_server() -> TestServer {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("in-memory database");
    assert!(persistence.ensure_admin("admin", ADMIN_PASSWORD).unwrap());
    let location_id: i64 = persistence.create_location("Pune").unwrap();
    let supervisor_id: i64 = create_supervisor(&mut persistence, "meena", location_id);

    let upload_dir: TempDir = TempDir::new().expect("temporary upload directory");
    let state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        documents: DocumentStore::new(upload_dir.path()),
        timezone: String::from("UTC"),
    };

    TestServer {
        app: build_router(state.clone()),
        state,
        upload_dir,
        location_id,
        supervisor_id,
    }
}

pub fn urlencoded(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// A `multipart/form-data` body and its content type.
pub fn multipart(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// The `name=value` pair a response sets for cookie `name`, unless it
/// clears it.
pub fn set_cookie(response: &Response, name: &str) -> Option<String> {
    let prefix: String = format!("{name}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&prefix) && pair.len() > prefix.len())
        .map(ToString::to_string)
}

/// The full `Set-Cookie` header for cookie `name`.
pub fn set_cookie_header(response: &Response, name: &str) -> Option<String> {
    let prefix: String = format!("{name}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
        .map(ToString::to_string)
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
}

pub fn header_value<'a>(response: &'a Response, name: header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).map(|v| v.to_str().unwrap())
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Joins cookie pairs into a `Cookie` header.
pub fn cookies(pairs: &[&str]) -> String {
    pairs.join("; ")
}

impl TestServer {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, body: String) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        cookie: &str,
        (content_type, body): (String, Vec<u8>),
    ) -> Response {
        let request: Request<Body> = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::COOKIE, cookie)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Signs in and returns the session cookie pair.
    pub async fn sign_in(&self, login_name: &str, password: &str) -> String {
        let response: Response = self
            .post_form(
                "/login",
                None,
                urlencoded(&[("username", login_name), ("password", password)]),
            )
            .await;
        assert_eq!(response.status(), 303);
        set_cookie(&response, "rollcall_session").expect("session cookie")
    }

    pub async fn sign_in_admin(&self) -> String {
        self.sign_in("admin", ADMIN_PASSWORD).await
    }

    pub async fn sign_in_supervisor(&self) -> String {
        self.sign_in("meena", SUPERVISOR_PASSWORD).await
    }

    /// Adds a pending employee under `meena` directly.
    pub async fn add_employee(&self, first_name: &str, last_name: &str) -> i64 {
        self.state
            .persistence
            .lock()
            .await
            .create_employee(
                self.supervisor_id,
                self.location_id,
                &test_person(first_name, last_name),
                &DocumentPaths::default(),
            )
            .unwrap()
    }

    /// Follows a redirect carrying its flash cookie and returns the page.
    pub async fn follow(&self, response: &Response, session: &str) -> serde_json::Value {
        let target: String = location(response).to_string();
        let cookie: String = set_cookie(response, "_flash").map_or_else(
            || session.to_string(),
            |flash| cookies(&[session, flash.as_str()]),
        );
        let page: Response = self.get(&target, Some(&cookie)).await;
        assert_eq!(page.status(), 200, "following {target}");
        body_json(page).await
    }
}
