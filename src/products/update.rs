use time::OffsetDateTime;

use super::dto::ProductInput;

/// A value bound to one positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i32),
    BigInt(i64),
    Timestamp(OffsetDateTime),
}

/// Rendered `UPDATE products ...` statement. `params[i]` binds to `$(i + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub sql: String,
    pub columns: Vec<&'static str>,
    pub params: Vec<SqlParam>,
}

/// Collects `SET` assignments and numbers their placeholders in push order.
#[derive(Debug, Default)]
pub struct UpdateBuilder {
    assignments: Vec<(&'static str, SqlParam)>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: SqlParam) -> Self {
        self.assignments.push((column, value));
        self
    }

    /// Adds a text assignment only when `value` is non-empty.
    pub fn set_non_blank(self, column: &'static str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.set(column, SqlParam::Text(value.to_owned()))
        }
    }

    /// Renders the statement with `WHERE id = $n` as the last placeholder.
    pub fn build(self, id: i64) -> UpdateStatement {
        let mut columns = Vec::with_capacity(self.assignments.len());
        let mut params = Vec::with_capacity(self.assignments.len() + 1);
        let mut sets = Vec::with_capacity(self.assignments.len());

        for (column, value) in self.assignments {
            params.push(value);
            sets.push(format!("{} = ${}", column, params.len()));
            columns.push(column);
        }
        params.push(SqlParam::BigInt(id));

        let sql = format!(
            "UPDATE products SET {} WHERE id = ${} \
             RETURNING id, sku_code, sku_name, sku_amount, expiration, create_at, update_at",
            sets.join(", "),
            params.len()
        );

        UpdateStatement {
            sql,
            columns,
            params,
        }
    }
}

/// Builds the partial update for `input`: code, name and expiration when
/// non-empty, then amount and `update_at` unconditionally.
pub fn update_non_blank(id: i64, input: &ProductInput, now: OffsetDateTime) -> UpdateStatement {
    UpdateBuilder::new()
        .set_non_blank("sku_code", &input.sku_code)
        .set_non_blank("sku_name", &input.sku_name)
        .set_non_blank("expiration", &input.expiration)
        .set("sku_amount", SqlParam::Int(input.sku_amount))
        .set("update_at", SqlParam::Timestamp(now))
        .build(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-06-01 12:00 UTC);

    #[test]
    fn all_fields_present() {
        let input = ProductInput {
            sku_code: "SKU001".into(),
            sku_name: "Widget".into(),
            sku_amount: 10,
            expiration: "2025-01-01".into(),
        };

        let stmt = update_non_blank(42, &input, NOW);

        assert_eq!(
            stmt.columns,
            vec!["sku_code", "sku_name", "expiration", "sku_amount", "update_at"]
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlParam::Text("SKU001".into()),
                SqlParam::Text("Widget".into()),
                SqlParam::Text("2025-01-01".into()),
                SqlParam::Int(10),
                SqlParam::Timestamp(NOW),
                SqlParam::BigInt(42),
            ]
        );
        assert!(stmt.sql.starts_with(
            "UPDATE products SET sku_code = $1, sku_name = $2, expiration = $3, \
             sku_amount = $4, update_at = $5 WHERE id = $6"
        ));
    }

    #[test]
    fn only_one_string_field_present() {
        let input = ProductInput {
            sku_name: "Renamed".into(),
            sku_amount: 3,
            ..Default::default()
        };

        let stmt = update_non_blank(7, &input, NOW);

        assert_eq!(stmt.columns, vec!["sku_name", "sku_amount", "update_at"]);
        assert_eq!(
            stmt.params,
            vec![
                SqlParam::Text("Renamed".into()),
                SqlParam::Int(3),
                SqlParam::Timestamp(NOW),
                SqlParam::BigInt(7),
            ]
        );
        assert!(stmt
            .sql
            .contains("SET sku_name = $1, sku_amount = $2, update_at = $3 WHERE id = $4"));
    }

    #[test]
    fn only_amount_present() {
        let input = ProductInput {
            sku_amount: 0,
            ..Default::default()
        };

        let stmt = update_non_blank(1, &input, NOW);

        assert_eq!(stmt.columns, vec!["sku_amount", "update_at"]);
        assert_eq!(stmt.params.len(), 3);
        assert_eq!(stmt.params[2], SqlParam::BigInt(1));
        assert!(stmt
            .sql
            .contains("SET sku_amount = $1, update_at = $2 WHERE id = $3"));
    }

    // Empty strings are treated as "not supplied": this keeps the stored value
    // and means a string column cannot be cleared through an update.
    #[test]
    fn empty_strings_are_skipped_not_cleared() {
        let input = ProductInput {
            sku_code: "SKU001".into(),
            sku_name: String::new(),
            sku_amount: 99,
            expiration: String::new(),
        };

        let stmt = update_non_blank(5, &input, NOW);

        assert!(!stmt.columns.contains(&"sku_name"));
        assert!(!stmt.columns.contains(&"expiration"));
        assert_eq!(stmt.columns, vec!["sku_code", "sku_amount", "update_at"]);
    }

    #[test]
    fn statement_returns_full_row() {
        let stmt = update_non_blank(1, &ProductInput::default(), NOW);
        assert!(stmt.sql.ends_with(
            "RETURNING id, sku_code, sku_name, sku_amount, expiration, create_at, update_at"
        ));
    }
}
