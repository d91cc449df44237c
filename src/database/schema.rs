// Versioned schema migrations, embedded at compile time from ./migrations.
// The schema is fixed once these have run; nothing alters it at request time.

use sqlx::migrate::Migrator;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
