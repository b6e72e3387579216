//! SQL schema for the Garage SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// Unique and foreign-key constraints back up the service-level checks.
/// Appointments restrict deletion of what they reference; a customer's
/// vehicles go with the customer.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS customers (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    document_number TEXT NOT NULL UNIQUE,
    document_type   TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    phone_number    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vehicles (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    make          TEXT NOT NULL,
    model         TEXT NOT NULL,
    license_plate TEXT NOT NULL UNIQUE,
    customer_id   INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL    -- RFC 3339 UTC, fixed width
);

CREATE TABLE IF NOT EXISTS fault_types (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS appointments (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_id     INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE RESTRICT,
    fault_type_id  INTEGER NOT NULL REFERENCES fault_types(id) ON DELETE RESTRICT,
    diagnosis_date TEXT NOT NULL,    -- YYYY-MM-DD
    diagnosis_time TEXT NOT NULL,    -- HH:MM:SS
    request_scan   INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS customers_phone_idx       ON customers(phone_number);
CREATE INDEX IF NOT EXISTS customers_last_name_idx   ON customers(last_name);
CREATE INDEX IF NOT EXISTS vehicles_customer_idx     ON vehicles(customer_id);
CREATE INDEX IF NOT EXISTS appointments_vehicle_idx  ON appointments(vehicle_id);
CREATE INDEX IF NOT EXISTS appointments_fault_idx    ON appointments(fault_type_id);
CREATE INDEX IF NOT EXISTS appointments_schedule_idx ON appointments(diagnosis_date, diagnosis_time);

PRAGMA user_version = 1;
";
