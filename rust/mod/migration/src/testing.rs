//! In-memory database with the slice of the ERP schema the repairs touch.

use openerp_sql::{Row, SQLStore, SqliteStore, Value};

pub const IR_SCHEMA: &str = "
CREATE TABLE ir_cron (
    id          INTEGER PRIMARY KEY,
    cron_name   TEXT NOT NULL,
    active      BOOLEAN NOT NULL DEFAULT 1
);
CREATE TABLE ir_model (
    id          INTEGER PRIMARY KEY,
    model       TEXT NOT NULL UNIQUE
);
CREATE TABLE ir_model_access (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    model_id    INTEGER NOT NULL REFERENCES ir_model(id)
);
CREATE TABLE ir_model_data (
    id          INTEGER PRIMARY KEY,
    module      TEXT NOT NULL,
    name        TEXT NOT NULL,
    model       TEXT NOT NULL,
    res_id      INTEGER,
    noupdate    BOOLEAN NOT NULL DEFAULT 0
);
CREATE TABLE ir_ui_view (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    model       TEXT,
    inherit_id  INTEGER REFERENCES ir_ui_view(id) ON DELETE RESTRICT,
    arch_db     TEXT
);
";

pub const EDI_DOCUMENT_SCHEMA: &str = "
CREATE TABLE account_edi_document (
    id              INTEGER PRIMARY KEY,
    edi_format_id   INTEGER
);
";

pub fn ir_db() -> SqliteStore {
    let db = SqliteStore::open_in_memory().unwrap();
    db.exec_batch(IR_SCHEMA).unwrap();
    db
}

pub fn insert_view(
    db: &dyn SQLStore,
    id: i64,
    name: &str,
    model: &str,
    inherit_id: Option<i64>,
    arch: &str,
) {
    db.exec(
        "INSERT INTO ir_ui_view (id, name, model, inherit_id, arch_db) VALUES (?1, ?2, ?3, ?4, ?5)",
        &[
            Value::Integer(id),
            Value::Text(name.into()),
            Value::Text(model.into()),
            Value::opt_integer(inherit_id),
            Value::Text(arch.into()),
        ],
    )
    .unwrap();
}

pub fn insert_model_data(
    db: &dyn SQLStore,
    id: i64,
    module: &str,
    name: &str,
    model: &str,
    res_id: i64,
    noupdate: bool,
) {
    db.exec(
        "INSERT INTO ir_model_data (id, module, name, model, res_id, noupdate) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        &[
            Value::Integer(id),
            Value::Text(module.into()),
            Value::Text(name.into()),
            Value::Text(model.into()),
            Value::Integer(res_id),
            Value::Integer(noupdate as i64),
        ],
    )
    .unwrap();
}

pub fn count(db: &dyn SQLStore, table: &str) -> i64 {
    db.query(&format!("SELECT COUNT(*) AS n FROM {table}"), &[])
        .unwrap()[0]
        .get_i64("n")
        .unwrap()
}

/// Every row of every table, in a stable order.
pub fn dump(db: &dyn SQLStore) -> Vec<(String, Vec<Row>)> {
    let tables = db
        .query(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
            &[],
        )
        .unwrap();
    tables
        .iter()
        .map(|t| {
            let name = t.get_str("name").unwrap().to_string();
            let rows = db
                .query(&format!("SELECT * FROM {name} ORDER BY id"), &[])
                .unwrap();
            (name, rows)
        })
        .collect()
}
