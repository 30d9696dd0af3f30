//! SQL statements for the folio MySQL store.

/// `contacts` DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const CREATE_CONTACTS: &str = "
CREATE TABLE IF NOT EXISTS contacts (
    id          INT AUTO_INCREMENT PRIMARY KEY,
    name        VARCHAR(255) NOT NULL,
    email       VARCHAR(255) NOT NULL,
    phone       VARCHAR(50),
    message     TEXT NOT NULL,
    created_at  TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

pub const TABLE_EXISTS: &str = "
SELECT COUNT(*) FROM information_schema.tables
WHERE table_schema = DATABASE() AND table_name = ?";

pub const LIST_TABLES: &str = "
SELECT CAST(table_name AS CHAR) FROM information_schema.tables
WHERE table_schema = DATABASE()
ORDER BY table_name";

pub const INSERT_CONTACT: &str =
  "INSERT INTO contacts (name, email, phone, message) VALUES (?, ?, ?, ?)";

pub const COUNT_CONTACTS: &str = "SELECT COUNT(*) FROM contacts";

pub const RECENT_CONTACTS: &str = "
SELECT CAST(id AS SIGNED) AS id, name, email, phone, message, created_at
FROM contacts
ORDER BY id DESC
LIMIT ?";
