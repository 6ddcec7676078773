use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// Product record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub sku_code: String,
    pub sku_name: String,
    pub sku_amount: i32,
    pub expiration: Option<String>, // NULL when never supplied
    pub create_at: OffsetDateTime,
    pub update_at: OffsetDateTime,
}

/// Product as exposed over HTTP. Zero and empty fields are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Product {
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sku_code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sku_name: String,
    #[serde(skip_serializing_if = "is_zero_i32")]
    pub sku_amount: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expiration: String,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_at: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_at: Option<OffsetDateTime>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id,
            sku_code: r.sku_code,
            sku_name: r.sku_name,
            sku_amount: r.sku_amount,
            expiration: r.expiration.unwrap_or_default(),
            create_at: Some(r.create_at),
            update_at: Some(r.update_at),
        }
    }
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}
