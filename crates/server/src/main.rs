// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod flash;
mod form;
mod handlers;
mod response;
mod session;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use clap::Parser;
use rollcall_api::DocumentStore;
use rollcall_domain::local_today;
use rollcall_persistence::{Persistence, PersistenceError};
use tokio::sync::Mutex;
use tower_cookies::CookieManagerLayer;
use tracing::info;

use crate::handlers::{
    handle_add_employee, handle_admin_dashboard, handle_admin_employee_form,
    handle_admin_update_employee, handle_approval_queue, handle_attendance_page,
    handle_attendance_week, handle_create_location, handle_create_supervisor,
    handle_delete_employee, handle_delete_supervisor, handle_edit_supervisor_form,
    handle_employee_detail, handle_export_attendance, handle_list_employees,
    handle_list_locations, handle_list_supervisors, handle_location_employees, handle_login,
    handle_login_page, handle_logout, handle_mark_attendance, handle_mark_attendance_week,
    handle_mark_notification_read, handle_new_employee_form, handle_new_supervisor_form,
    handle_notifications, handle_review_employee, handle_supervisor_dashboard,
    handle_supervisor_employee_form, handle_supervisor_update_employee, handle_update_supervisor,
    handle_upload, handle_weekly_export,
};

/// Four document images plus the text fields of a profile form.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Rollcall Server - HTTP server for the Rollcall attendance system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ROLLCALL_DATABASE")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes precedence over `--database`.
    #[cfg(feature = "mysql")]
    #[arg(long, env = "ROLLCALL_MYSQL_URL")]
    mysql_url: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "ROLLCALL_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "ROLLCALL_PORT", default_value_t = 3000)]
    port: u16,

    /// Directory uploaded documents are stored under
    #[arg(long, env = "ROLLCALL_UPLOAD_DIR", default_value = "./uploads")]
    upload_dir: PathBuf,

    /// IANA timezone that decides which day is "today"
    #[arg(long, env = "ROLLCALL_TIMEZONE", default_value = "UTC")]
    timezone: String,

    /// Login name of the bootstrap administrator
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    admin_login: String,

    /// Password of the bootstrap administrator, used only when it is created
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin123", hide_env_values = true)]
    admin_password: String,
}

/// Application state shared across handlers.
///
/// The single persistence connection sits behind a Mutex; each request
/// holds it for the duration of its database work.
#[derive(Clone)]
pub struct AppState {
    pub persistence: Arc<Mutex<Persistence>>,
    pub documents: DocumentStore,
    /// IANA timezone name.
    pub timezone: String,
}

/// Opens the configured database.
fn open_persistence(args: &Args) -> Result<Persistence, PersistenceError> {
    #[cfg(feature = "mysql")]
    if let Some(url) = &args.mysql_url {
        info!("Using MySQL database");
        return Persistence::new_with_mysql(url);
    }

    if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()
    }
}

/// Marks every response uncacheable unless its handler chose otherwise.
async fn no_store_headers(request: Request, next: Next) -> Response {
    let mut response: Response = next.run(request).await;
    let headers = response.headers_mut();
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("-1"));
    }
    response
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_login_page))
        .route("/login", get(handle_login_page).post(handle_login))
        .route("/logout", get(handle_logout))
        .route("/uploads/{*path}", get(handle_upload))
        .route("/admin/dashboard", get(handle_admin_dashboard))
        .route(
            "/admin/locations",
            get(handle_list_locations).post(handle_create_location),
        )
        .route("/admin/supervisors", get(handle_list_supervisors))
        .route(
            "/admin/add_supervisor",
            get(handle_new_supervisor_form).post(handle_create_supervisor),
        )
        .route(
            "/admin/supervisors/edit/{supervisor_id}",
            get(handle_edit_supervisor_form).post(handle_update_supervisor),
        )
        .route(
            "/admin/supervisors/delete/{supervisor_id}",
            post(handle_delete_supervisor),
        )
        .route("/admin/approve-employees", get(handle_approval_queue))
        .route(
            "/admin/employee_action/{employee_id}/{action}",
            get(handle_review_employee),
        )
        .route("/admin/download-attendance", get(handle_export_attendance))
        .route("/admin/employees", get(handle_list_employees))
        .route("/admin/employees/{employee_id}", get(handle_employee_detail))
        .route(
            "/admin/employees/{employee_id}/edit",
            get(handle_admin_employee_form).post(handle_admin_update_employee),
        )
        .route(
            "/admin/employees/{employee_id}/delete",
            post(handle_delete_employee),
        )
        .route("/admin/notifications", get(handle_notifications))
        .route(
            "/admin/notifications/{notification_id}/read",
            post(handle_mark_notification_read),
        )
        .route("/supervisor/dashboard", get(handle_supervisor_dashboard))
        .route("/supervisor/employee_list", get(handle_location_employees))
        .route("/supervisor/my_employees", get(handle_location_employees))
        .route(
            "/supervisor/mark_attendance",
            get(handle_attendance_page).post(handle_mark_attendance),
        )
        .route(
            "/supervisor/mark_attendance/{week_offset}",
            get(handle_attendance_week).post(handle_mark_attendance_week),
        )
        .route("/supervisor/download_attendance", get(handle_weekly_export))
        .route(
            "/supervisor/add_employee",
            get(handle_new_employee_form).post(handle_add_employee),
        )
        .route(
            "/supervisor/edit_employee/{employee_id}",
            get(handle_supervisor_employee_form).post(handle_supervisor_update_employee),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(no_store_headers))
        .layer(CookieManagerLayer::new())
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Rollcall Server");

    // Fail fast on an unknown timezone
    let today = local_today(&args.timezone, chrono::Utc::now())?;
    info!(timezone = %args.timezone, %today, "Resolved local date");

    let mut persistence: Persistence = open_persistence(&args)?;
    if persistence.ensure_admin(&args.admin_login, &args.admin_password)? {
        info!(login_name = %args.admin_login, "Created bootstrap administrator");
    }

    tokio::fs::create_dir_all(&args.upload_dir).await?;
    info!(upload_dir = %args.upload_dir.display(), "Storing documents");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        documents: DocumentStore::new(args.upload_dir.clone()),
        timezone: args.timezone,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
