//! Database bootstrap: create the target database and the `pets` table on
//! startup so a fresh server comes up against an empty PostgreSQL instance.

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// `pets` table DDL. Ids are generated by the database; `creation_date`
/// defaults server-side but is always bound explicitly on insert.
const PETS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS pets (
        id INTEGER GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
        name TEXT NOT NULL,
        breed TEXT,
        color TEXT,
        age INTEGER NOT NULL,
        weight REAL NOT NULL,
        creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

/// Create the `pets` table if it does not exist.
pub async fn ensure_pets_table(pool: &PgPool) -> Result<(), AppError> {
    tracing::debug!(sql = PETS_DDL, "ensure pets table");
    sqlx::query(PETS_DDL).execute(pool).await?;
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Internal(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Internal("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_db_name_and_admin_url() {
        let (admin, name) =
            parse_db_name_from_url("postgres://user:pw@localhost:5432/pets").unwrap();
        assert_eq!(admin, "postgres://user:pw@localhost:5432/postgres");
        assert_eq!(name, "pets");
    }

    #[test]
    fn strips_query_string_from_db_name() {
        let (_, name) =
            parse_db_name_from_url("postgres://localhost/pets?sslmode=disable").unwrap();
        assert_eq!(name, "pets");
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("pets"), "\"pets\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\\\"ird\"");
    }
}
