use crate::domain::batch::TokenizedGift;
use crate::error::{ElevateError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct GiftRecord {
    token: String,
    method: String,
    amount: Decimal,
    currency: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl From<GiftRecord> for TokenizedGift {
    fn from(record: GiftRecord) -> Self {
        Self {
            payment_method_token: record.token,
            payment_method_type: record.method,
            amount: record.amount,
            currency_code: record.currency,
            first_name: record.first_name.filter(|name| !name.is_empty()),
            last_name: record.last_name.filter(|name| !name.is_empty()),
        }
    }
}

/// Reads tokenized gifts from a CSV source.
///
/// Expected header: `token, method, amount, currency, first_name, last_name`.
/// The name columns may be empty or missing.
pub struct GiftReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> GiftReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes one gift per record.
    pub fn gifts(self) -> impl Iterator<Item = Result<TokenizedGift>> {
        self.reader
            .into_deserialize::<GiftRecord>()
            .map(|result| result.map(TokenizedGift::from).map_err(ElevateError::from))
    }
}
