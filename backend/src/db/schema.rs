//! Static schema for the access-control domain
//!
//! Tables are created if missing; nothing is altered or dropped. UUIDs and
//! timestamps are TEXT, enumerations are TEXT holding the member name.

use sqlx::SqlitePool;
use tracing::{debug, info};

/// Tables in dependency order
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"CREATE TABLE IF NOT EXISTS users (
            usr_id TEXT PRIMARY KEY NOT NULL,
            email TEXT,
            login TEXT NOT NULL UNIQUE,
            name TEXT,
            picture TEXT,
            insert_date TEXT NOT NULL DEFAULT (datetime('now')),
            update_date TEXT
        )"#,
    ),
    (
        "access_controls",
        r#"CREATE TABLE IF NOT EXISTS access_controls (
            aco_id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('ROLE', 'GROUP', 'SCOPE')),
            insert_date TEXT NOT NULL DEFAULT (datetime('now')),
            update_date TEXT
        )"#,
    ),
    (
        "libraries",
        r#"CREATE TABLE IF NOT EXISTS libraries (
            lib_id TEXT PRIMARY KEY NOT NULL,
            url TEXT,
            documentation_url TEXT,
            name TEXT NOT NULL,
            version TEXT NOT NULL,
            maintainer TEXT,
            description TEXT,
            icon TEXT,
            insert_date TEXT NOT NULL DEFAULT (datetime('now')),
            update_date TEXT
        )"#,
    ),
    (
        "library_templates",
        r#"CREATE TABLE IF NOT EXISTS library_templates (
            lit_id TEXT PRIMARY KEY NOT NULL,
            lib_id TEXT NOT NULL REFERENCES libraries (lib_id) ON DELETE CASCADE,
            documentation_url TEXT,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('PROJECT', 'DIAGRAM', 'COMPONENT')),
            description TEXT,
            base_path TEXT,
            plugins TEXT,
            icon TEXT,
            insert_date TEXT NOT NULL DEFAULT (datetime('now')),
            update_date TEXT
        )"#,
    ),
    (
        "permissions",
        r#"CREATE TABLE IF NOT EXISTS permissions (
            per_id TEXT PRIMARY KEY NOT NULL,
            entity TEXT NOT NULL,
            action TEXT NOT NULL CHECK (action IN ('ACCESS', 'CREATE', 'DELETE', 'UPDATE')),
            lib_id TEXT REFERENCES libraries (lib_id) ON DELETE CASCADE,
            insert_date TEXT NOT NULL DEFAULT (datetime('now')),
            update_date TEXT
        )"#,
    ),
    (
        "access_controls_permissions",
        r#"CREATE TABLE IF NOT EXISTS access_controls_permissions (
            pac_id INTEGER PRIMARY KEY AUTOINCREMENT,
            aco_id TEXT NOT NULL REFERENCES access_controls (aco_id) ON DELETE CASCADE,
            per_id TEXT NOT NULL REFERENCES permissions (per_id) ON DELETE CASCADE,
            insert_date TEXT NOT NULL DEFAULT (datetime('now')),
            update_date TEXT
        )"#,
    ),
    (
        "users_access_controls",
        r#"CREATE TABLE IF NOT EXISTS users_access_controls (
            uac_id INTEGER PRIMARY KEY AUTOINCREMENT,
            usr_id TEXT NOT NULL REFERENCES users (usr_id) ON DELETE CASCADE,
            aco_id TEXT NOT NULL REFERENCES access_controls (aco_id) ON DELETE CASCADE,
            insert_date TEXT NOT NULL DEFAULT (datetime('now')),
            update_date TEXT
        )"#,
    ),
    (
        "access_controls_tree",
        r#"CREATE TABLE IF NOT EXISTS access_controls_tree (
            act_id INTEGER PRIMARY KEY AUTOINCREMENT,
            parent TEXT NOT NULL REFERENCES access_controls (aco_id) ON DELETE CASCADE,
            current TEXT NOT NULL REFERENCES access_controls (aco_id) ON DELETE CASCADE,
            insert_date TEXT NOT NULL DEFAULT (datetime('now')),
            update_date TEXT
        )"#,
    ),
];

const VIEWS: &[(&str, &str)] = &[
    (
        "users_access_controls_view",
        r#"CREATE VIEW IF NOT EXISTS users_access_controls_view AS
            SELECT uac.usr_id || '_' || uac.aco_id AS usa_id,
                   u.usr_id,
                   u.email,
                   u.login,
                   u.name AS user_name,
                   ac.aco_id,
                   ac.name AS access_control_name,
                   ac.type
            FROM users_access_controls uac
            JOIN users u ON u.usr_id = uac.usr_id
            JOIN access_controls ac ON ac.aco_id = uac.aco_id"#,
    ),
    (
        "users_permissions_view",
        r#"CREATE VIEW IF NOT EXISTS users_permissions_view AS
            SELECT DISTINCT uac.usr_id || '_' || p.per_id AS usp_id,
                   uac.usr_id,
                   p.per_id,
                   p.entity,
                   p.action,
                   p.lib_id,
                   p.insert_date,
                   p.update_date
            FROM users_access_controls uac
            JOIN access_controls_permissions acp ON acp.aco_id = uac.aco_id
            JOIN permissions p ON p.per_id = acp.per_id"#,
    ),
    (
        "access_controls_tree_view",
        r#"CREATE VIEW IF NOT EXISTS access_controls_tree_view AS
            WITH RECURSIVE tree (current, parent, direct) AS (
                SELECT current, parent, 1 FROM access_controls_tree
                UNION
                SELECT t.current, link.parent, 0
                FROM tree t
                JOIN access_controls_tree link ON link.current = t.parent
            )
            SELECT t.current || '_' || t.parent AS aca_id,
                   c.aco_id,
                   c.type,
                   c.name,
                   p.aco_id AS parent,
                   p.name AS parent_name,
                   p.type AS parent_type,
                   MAX(t.direct) AS direct
            FROM tree t
            JOIN access_controls c ON c.aco_id = t.current
            JOIN access_controls p ON p.aco_id = t.parent
            GROUP BY t.current, t.parent"#,
    ),
];

/// Check if a table or view exists in the database
async fn object_exists(pool: &SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Create every missing table and view, returning the names created
pub async fn apply_schema(pool: &SqlitePool) -> Result<Vec<&'static str>, sqlx::Error> {
    let mut created = Vec::new();
    for (name, ddl) in TABLES.iter().chain(VIEWS) {
        if object_exists(pool, name).await? {
            continue;
        }
        debug!(name, "Creating schema object");
        sqlx::query(ddl).execute(pool).await?;
        created.push(*name);
    }

    if !created.is_empty() {
        info!(count = created.len(), "Schema objects created");
    }
    Ok(created)
}
