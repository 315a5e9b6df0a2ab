use anyhow::Context;
use postgres::{Client, NoTls};

use crate::source::{WppRow, WppTable};

/// Load the single-age WPP table from Postgres table `wpp_population`.
///
/// Expected columns: `location TEXT, year INTEGER, age INTEGER, pop_male DOUBLE PRECISION,
/// pop_female DOUBLE PRECISION, pop_total DOUBLE PRECISION NULL`, all in thousands.
///
/// `pg_conn_str` example:
/// "host=127.0.0.1 port=5432 user=poprank password=poprank dbname=wpp"
pub fn load_wpp_pg(pg_conn_str: &str) -> anyhow::Result<WppTable> {
    let mut client = Client::connect(pg_conn_str, NoTls)
        .with_context(|| format!("Failed to connect to Postgres ({})", redact_conn_str(pg_conn_str)))?;

    let rows = client
        .query(
            "SELECT location, year, age, pop_male, pop_female, pop_total FROM wpp_population",
            &[],
        )
        .with_context(|| "Failed to query wpp_population")?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let location: String = row.try_get(0)?;
        let year: i32 = row.try_get(1)?;
        let age: i32 = row.try_get(2)?;
        let age = u32::try_from(age).with_context(|| format!("negative age {} for {} {}", age, location, year))?;
        let pop_male: f64 = row.try_get(3)?;
        let pop_female: f64 = row.try_get(4)?;
        let pop_total: Option<f64> = row.try_get(5)?;
        out.push(WppRow {
            location,
            year,
            age,
            pop_male: pop_male.max(0.0),
            pop_female: pop_female.max(0.0),
            pop_total: pop_total.map(|v| v.max(0.0)),
        });
    }
    anyhow::ensure!(!out.is_empty(), "wpp_population is empty");

    let table = WppTable::from_rows(out);
    tracing::info!(rows = table.len(), "loaded population table from Postgres");
    Ok(table)
}

/// Drop the password from a libpq key=value connection string before it reaches a log or error.
pub fn redact_conn_str(conn_str: &str) -> String {
    conn_str
        .split_whitespace()
        .map(|kv| match kv.split_once('=') {
            Some((k, _)) if k.eq_ignore_ascii_case("password") => format!("{}=***", k),
            _ => kv.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_password_only() {
        let s = redact_conn_str("host=127.0.0.1 port=5432 user=u password=hunter2 dbname=wpp");
        assert_eq!(s, "host=127.0.0.1 port=5432 user=u password=*** dbname=wpp");
    }
}
