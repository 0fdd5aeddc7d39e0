// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Build, lint, and test automation for the Rollcall workspace.
//!
//! `cargo test` covers the `SQLite` backend with no infrastructure. The
//! `MariaDB` commands are opt-in and manage their own Docker container:
//!
//! - `cargo xtask test-mariadb` runs the ignored backend validation tests
//! - `cargo xtask verify-migrations` compares the schemas both migration
//!   sets produce

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::process::Output;
use std::thread::sleep;
use std::time::Duration;

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use diesel::sql_types::{Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

const PERSISTENCE_PACKAGE: &str = "rollcall-persistence";

const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");
const MYSQL_MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("../crates/persistence/migrations_mysql");

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Lint formatting, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks. The `MariaDB` commands need Docker and stay out of CI.
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()
}

fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()
}

fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Build docs for every default package with docs.rs flags.
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            [
                "doc",
                "--no-deps",
                "--all-features",
                "--package",
                &package.name,
            ],
        )
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .env("RUSTDOCFLAGS", "--cfg docsrs -D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

fn lint_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all", "--check"])
}

fn fix_format() -> Result<()> {
    run_cargo_nightly(vec!["fmt", "--all"])
}

/// Unit and router tests, then doc tests.
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets"])?;
    run_cargo(vec!["test", "--doc"])
}

fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

fn run_cargo_nightly(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args)
        // set by cargo for subcommands
        .env_remove("CARGO")
        .env("RUSTUP_TOOLCHAIN", "nightly")
        .run_with_trace()?;
    Ok(())
}

/// A throwaway `MariaDB` 11 container, removed on drop.
struct MariaDb {
    container: &'static str,
    database: &'static str,
    user: &'static str,
    password: &'static str,
    port: u16,
}

impl MariaDb {
    const READY_ATTEMPTS: u32 = 30;

    /// Starts the container and waits until it answers queries.
    fn start(
        container: &'static str,
        database: &'static str,
        password: &'static str,
        port: u16,
    ) -> Result<Self> {
        cmd!("docker", "--version")
            .run_with_trace()
            .wrap_err("Docker is not available. Please install Docker.")?;

        let db: Self = Self {
            container,
            database,
            user: "rollcall",
            password,
            port,
        };
        db.remove();

        tracing::info!(container, "Starting MariaDB container");
        cmd!(
            "docker",
            "run",
            "--name",
            container,
            "-e",
            format!("MARIADB_DATABASE={database}"),
            "-e",
            format!("MARIADB_USER={}", db.user),
            "-e",
            format!("MARIADB_PASSWORD={password}"),
            "-e",
            "MARIADB_ROOT_PASSWORD=root_password",
            "-p",
            format!("{port}:3306"),
            "-d",
            "mariadb:11"
        )
        .run_with_trace()
        .wrap_err("Failed to start MariaDB container")?;

        db.wait_ready()?;
        Ok(db)
    }

    fn wait_ready(&self) -> Result<()> {
        for attempt in 1..=Self::READY_ATTEMPTS {
            sleep(Duration::from_secs(1));
            tracing::debug!(attempt, "Probing MariaDB");

            let probe = cmd!(
                "docker",
                "exec",
                self.container,
                "mariadb",
                "-u",
                self.user,
                format!("-p{}", self.password),
                "-e",
                "SELECT 1"
            )
            .stdout_null()
            .stderr_null()
            .run();

            if probe.is_ok() {
                tracing::info!("MariaDB is ready");
                return Ok(());
            }
        }
        Err(eyre!("MariaDB did not become ready within timeout"))
    }

    fn url(&self) -> String {
        format!(
            "mysql://{}:{}@127.0.0.1:{}/{}",
            self.user, self.password, self.port, self.database
        )
    }

    fn remove(&self) {
        let _ = cmd!("docker", "stop", self.container)
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run();
        let _ = cmd!("docker", "rm", self.container)
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run();
    }
}

impl Drop for MariaDb {
    fn drop(&mut self) {
        tracing::info!(container = self.container, "Removing MariaDB container");
        self.remove();
    }
}

/// Runs the ignored backend validation tests in `rollcall-persistence`
/// against a fresh `MariaDB`.
///
/// Requires Docker and a free port 3307. The tests read `DATABASE_URL`
/// and `ROLLCALL_TEST_BACKEND`.
fn test_mariadb() -> Result<()> {
    let db: MariaDb = MariaDb::start("rollcall-test-mariadb", "rollcall_test", "test_password", 3307)?;

    tracing::info!("Running MariaDB backend validation tests");
    cmd!(
        "cargo",
        "test",
        "--package",
        PERSISTENCE_PACKAGE,
        "--features",
        "mysql",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", db.url())
    .env("ROLLCALL_TEST_BACKEND", "mariadb")
    .run_with_trace()
    .wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Applies both migration sets and fails on any structural difference.
///
/// Columns are compared by normalized type and nullability. `MySQL` may
/// carry extra single-column indexes on foreign key columns.
fn verify_migrations() -> Result<()> {
    let db: MariaDb = MariaDb::start(
        "rollcall-verify-migrations",
        "rollcall_verify",
        "verify_password",
        3308,
    )?;

    let mut sqlite = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut sqlite)
        .wrap_err("Failed to enable foreign keys on SQLite")?;
    sqlite
        .run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply SQLite migrations: {e}"))?;

    let mut mysql = MysqlConnection::establish(&db.url()).wrap_err("Failed to connect to MariaDB")?;
    mysql
        .run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| eyre!("Failed to apply MySQL migrations: {e}"))?;

    let sqlite_schema: Schema = introspect_sqlite(&mut sqlite)?;
    let mysql_schema: Schema = introspect_mysql(&mut mysql, db.database)?;
    compare_schemas(&sqlite_schema, &mysql_schema)?;

    tracing::info!(
        tables = sqlite_schema.len(),
        "Schema parity verification passed"
    );
    Ok(())
}

type Schema = BTreeMap<String, Table>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Table {
    /// Column name to (normalized type, nullable).
    columns: BTreeMap<String, (String, bool)>,
    primary_keys: BTreeSet<String>,
    /// (column, referenced table, referenced column)
    foreign_keys: BTreeSet<(String, String, String)>,
    unique_constraints: BTreeSet<Vec<String>>,
    indexes: BTreeSet<Vec<String>>,
}

fn introspect_sqlite(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        origin: String,
    }

    #[derive(QueryableByName)]
    struct IndexColumn {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    let mut schema: Schema = Schema::new();
    for table in tables {
        let mut info: Table = Table::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(format!("PRAGMA table_info({})", table.name))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get columns for table {}", table.name))?;
        for column in columns {
            if column.pk > 0 {
                info.primary_keys.insert(column.name.clone());
            }
            info.columns.insert(
                column.name,
                (normalize_sqlite_type(&column.r#type), column.notnull == 0),
            );
        }

        let foreign_keys: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err_with(|| format!("Failed to get foreign keys for table {}", table.name))?;
        info.foreign_keys.extend(
            foreign_keys
                .into_iter()
                .map(|fk| (fk.from, fk.table, fk.to)),
        );

        let indexes: Vec<IndexInfo> = diesel::sql_query(format!("PRAGMA index_list({})", table.name))
            .load(conn)
            .wrap_err_with(|| format!("Failed to get indexes for table {}", table.name))?;
        for index in indexes {
            let columns: Vec<String> = diesel::sql_query(format!("PRAGMA index_info({})", index.name))
                .load::<IndexColumn>(conn)
                .wrap_err_with(|| format!("Failed to get index columns for {}", index.name))?
                .into_iter()
                .map(|c| c.name)
                .collect();

            if index.origin == "u" {
                info.unique_constraints.insert(columns);
            } else if !index.name.starts_with("sqlite_autoindex_") {
                info.indexes.insert(columns);
            }
        }

        schema.insert(table.name, info);
    }

    Ok(schema)
}

fn introspect_mysql(conn: &mut MysqlConnection, database: &str) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        table_name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        data_type: String,
        #[diesel(sql_type = Text)]
        is_nullable: String,
        #[diesel(sql_type = Text)]
        column_key: String,
    }

    #[derive(QueryableByName)]
    #[allow(clippy::struct_field_names)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Text)]
        referenced_table_name: String,
        #[diesel(sql_type = Text)]
        referenced_column_name: String,
    }

    #[derive(QueryableByName)]
    struct KeyPart {
        #[diesel(sql_type = Text)]
        index_name: String,
        #[diesel(sql_type = Text)]
        column_name: String,
        #[diesel(sql_type = Integer)]
        non_unique: i32,
    }

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT table_name FROM information_schema.tables WHERE table_schema = ? \
         AND table_name != '__diesel_schema_migrations' ORDER BY table_name",
    )
    .bind::<Text, _>(database)
    .load(conn)
    .wrap_err("Failed to query MySQL tables")?;

    let mut schema: Schema = Schema::new();
    for table in tables {
        let name: &str = &table.table_name;
        let mut info: Table = Table::default();

        let columns: Vec<ColumnInfo> = diesel::sql_query(
            "SELECT column_name, data_type, is_nullable, column_key FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get columns for table {name}"))?;
        for column in columns {
            if column.column_key == "PRI" {
                info.primary_keys.insert(column.column_name.clone());
            }
            info.columns.insert(
                column.column_name,
                (
                    normalize_mysql_type(&column.data_type),
                    column.is_nullable == "YES",
                ),
            );
        }

        let foreign_keys: Vec<ForeignKeyInfo> = diesel::sql_query(
            "SELECT column_name, referenced_table_name, referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get foreign keys for table {name}"))?;
        info.foreign_keys.extend(foreign_keys.into_iter().map(|fk| {
            (
                fk.column_name,
                fk.referenced_table_name,
                fk.referenced_column_name,
            )
        }));

        let key_parts: Vec<KeyPart> = diesel::sql_query(
            "SELECT index_name, column_name, non_unique FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to get indexes for table {name}"))?;

        let mut unique: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut plain: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for part in key_parts {
            let target = if part.non_unique == 0 {
                &mut unique
            } else {
                &mut plain
            };
            target.entry(part.index_name).or_default().push(part.column_name);
        }
        info.unique_constraints.extend(unique.into_values());
        info.indexes.extend(plain.into_values());

        schema.insert(table.table_name, info);
    }

    Ok(schema)
}

fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper: String = sqlite_type.to_uppercase();
    let normalized: &str = if upper.contains("INT") {
        "integer"
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real"
    } else if upper.contains("BLOB") {
        "blob"
    } else {
        "text"
    };
    normalized.to_string()
}

#[allow(clippy::match_same_arms)]
fn normalize_mysql_type(mysql_type: &str) -> String {
    let normalized: &str = match mysql_type.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => "integer",
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => "real",
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => "blob",
        // DATE, DATETIME, and the text family are stored as TEXT in SQLite
        _ => "text",
    };
    normalized.to_string()
}

fn compare_schemas(sqlite: &Schema, mysql: &Schema) -> Result<()> {
    let sqlite_tables: BTreeSet<&String> = sqlite.keys().collect();
    let mysql_tables: BTreeSet<&String> = mysql.keys().collect();
    if sqlite_tables != mysql_tables {
        return Err(eyre!(
            "Schema parity check failed: tables only in SQLite {:?}, only in MySQL {:?}",
            sqlite_tables.difference(&mysql_tables).collect::<Vec<_>>(),
            mysql_tables.difference(&sqlite_tables).collect::<Vec<_>>()
        ));
    }

    for (name, lite) in sqlite {
        let Some(my) = mysql.get(name) else {
            continue;
        };

        if lite.columns != my.columns {
            return Err(eyre!(
                "Schema parity check failed: columns differ in table '{name}'\n  SQLite: {:?}\n  MySQL: {:?}",
                lite.columns,
                my.columns
            ));
        }
        if lite.primary_keys != my.primary_keys {
            return Err(eyre!(
                "Schema parity check failed: primary key differs in table '{name}'\n  SQLite: {:?}\n  MySQL: {:?}",
                lite.primary_keys,
                my.primary_keys
            ));
        }
        if lite.foreign_keys != my.foreign_keys {
            return Err(eyre!(
                "Schema parity check failed: foreign keys differ in table '{name}'\n  SQLite: {:?}\n  MySQL: {:?}",
                lite.foreign_keys,
                my.foreign_keys
            ));
        }
        if lite.unique_constraints != my.unique_constraints {
            return Err(eyre!(
                "Schema parity check failed: unique constraints differ in table '{name}'\n  SQLite: {:?}\n  MySQL: {:?}",
                lite.unique_constraints,
                my.unique_constraints
            ));
        }

        if let Some(missing) = lite.indexes.difference(&my.indexes).next() {
            return Err(eyre!(
                "Schema parity check failed: index {missing:?} missing in MySQL table '{name}'"
            ));
        }
        let fk_columns: BTreeSet<&String> = my.foreign_keys.iter().map(|(from, _, _)| from).collect();
        for extra in my.indexes.difference(&lite.indexes) {
            let fk_index: bool = matches!(extra.as_slice(), [column] if fk_columns.contains(column));
            if !fk_index {
                return Err(eyre!(
                    "Schema parity check failed: unexpected index {extra:?} in MySQL table '{name}'"
                ));
            }
        }
    }

    Ok(())
}

/// Logs a `duct::Expression` before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command may have scrolled off the screen
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
