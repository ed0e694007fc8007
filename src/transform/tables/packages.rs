//! `packages` transform: pull the price out of the description.
//!
//! Descriptions carry the price as a bold marker, `**50**`. The transform
//! adds a `price` column holding the number and leaves the bare number in
//! the description.

use nom::{bytes::complete::tag, character::complete::digit1, sequence::delimited, IResult};
use tracing::warn;

use crate::tokenizer::Value;
use crate::transform::traits::*;

const DESCRIPTION_COLUMNS: &str = r#""description", "display_order""#;
const PRICED_COLUMNS: &str = r#""price", "description", "display_order""#;

/// id, name, description, display_order
const EXPECTED_VALUES: usize = 4;

/// Adds a `price` column extracted from `**<digits>**` in the description.
pub struct PackagesTransform;

impl TableTransform for PackagesTransform {
    fn table(&self) -> &'static str {
        "packages"
    }

    fn apply(&self, row: Row) -> Outcome {
        if !row.prefix.contains(DESCRIPTION_COLUMNS) {
            warn!(
                table = "packages",
                "column list has no description/display_order pair; passing through"
            );
            return Outcome::PassThrough;
        }

        let [id, name, description, display_order]: [Value; EXPECTED_VALUES] =
            match row.values.try_into() {
                Ok(values) => values,
                Err(values) => {
                    warn!(
                        table = "packages",
                        count = values.len(),
                        expected = EXPECTED_VALUES,
                        "unexpected value count; passing through"
                    );
                    return Outcome::PassThrough;
                }
            };

        let extracted = split_price(&description.content());
        let (price, description) = match extracted {
            Some((price, cleaned)) => (Value::bare(price), Value::quoted(&cleaned)),
            None => (Value::null(), description),
        };

        Outcome::Rewrite(Row {
            prefix: row.prefix.replace(DESCRIPTION_COLUMNS, PRICED_COLUMNS),
            values: vec![id, name, price, description, display_order],
        })
    }
}

/// Find the first `**<digits>**` marker. Returns the price and the
/// description with every `**<price>**` marker, plus the whitespace after
/// it, replaced by the bare number. Markers are matched on the price with
/// leading zeros dropped, so `**050**` sets the price but stays in the text.
fn split_price(description: &str) -> Option<(String, String)> {
    let digits = description
        .char_indices()
        .find_map(|(at, _)| price_marker(&description[at..]).ok().map(|(_, d)| d))?;

    let price = match digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    let marker = format!("**{}**", price);
    let mut cleaned = String::with_capacity(description.len());
    let mut rest = description;
    while let Some(at) = rest.find(&marker) {
        cleaned.push_str(&rest[..at]);
        cleaned.push_str(price);
        rest = rest[at + marker.len()..].trim_start();
    }
    cleaned.push_str(rest);

    Some((price.to_string(), cleaned))
}

fn price_marker(input: &str) -> IResult<&str, &str> {
    delimited(tag("**"), digit1, tag("**"))(input)
}
