use serde::{Deserialize, Deserializer, Serialize};

/// Request body for create and update.
///
/// Every field is optional on the wire, and an explicit `null` reads the same
/// as an absent field. For updates an empty string means "leave the stored
/// value unchanged", so a string column cannot be cleared.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductInput {
    #[serde(deserialize_with = "null_as_default")]
    pub sku_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sku_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sku_amount: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub expiration: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ProductInput {
    /// Checks the business rules shared by create and update. The first
    /// violated rule is returned as a client-facing message.
    pub fn validate(&self) -> Result<(), String> {
        if self.sku_code.is_empty() {
            return Err("sku_code must not be empty".into());
        }
        if self.sku_amount < 0 {
            return Err("sku_amount must not be negative".into());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}
