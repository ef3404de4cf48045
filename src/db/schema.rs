pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    category_id TEXT PRIMARY KEY NOT NULL,
    month       TEXT NOT NULL,
    type        TEXT NOT NULL CHECK (type IN ('income', 'expense')),
    name        TEXT NOT NULL,
    expected    TEXT NOT NULL DEFAULT '0',
    tags        TEXT NOT NULL DEFAULT '[]',
    require_all BOOLEAN NOT NULL DEFAULT 0,
    amount_sign TEXT CHECK (amount_sign IS NULL OR amount_sign IN ('positive', 'negative')),
    sort_order  INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_categories_month ON categories(month);

CREATE TABLE IF NOT EXISTS rollovers (
    rollover_id   TEXT PRIMARY KEY NOT NULL,
    source_month  TEXT NOT NULL,
    from_category TEXT NOT NULL,
    to_category   TEXT NOT NULL,
    to_month      TEXT NOT NULL,
    amount        TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_rollovers_source_month ON rollovers(source_month);
CREATE INDEX IF NOT EXISTS idx_rollovers_to_month ON rollovers(to_month);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
