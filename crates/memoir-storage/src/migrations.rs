// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema migrations, embedded at build time from `migrations/`.

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Bring the schema up to date. Refinery records applied versions in its
/// own `refinery_schema_history` table, so reruns are no-ops.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), tokio_rusqlite::Error> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
    Ok(())
}
