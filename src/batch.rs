//! Parallel validation of many payloads against one schema.

use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::error::SchemaError;
use crate::schema::Schema;
use crate::validate_against_schema;

/// Validates each payload independently, in parallel.
///
/// The output has one entry per payload, in input order, each holding that
/// payload's error messages. A schema defect found while walking any payload
/// is returned instead.
///
/// # Example
///
/// ```rust
/// use avrocheck::{validate_batch, Schema};
/// use serde_json::json;
///
/// let schema = Schema::parse(&json!({
///     "type": "record",
///     "name": "Reading",
///     "fields": [{"name": "celsius", "type": "double"}]
/// }))
/// .unwrap();
///
/// let results = validate_batch(&schema, &[
///     json!({"celsius": 21.5}),
///     json!({"celsius": "warm"}),
///     json!({}),
/// ])
/// .unwrap();
///
/// assert!(results[0].is_empty());
/// assert_eq!(
///     results[1],
///     vec![r#"Invalid type for field 'celsius', expected: "double", received: string"#]
/// );
/// assert_eq!(results[2], vec!["Missing required field: 'celsius'"]);
/// ```
pub fn validate_batch(
    schema: &Schema,
    payloads: &[Value],
) -> Result<Vec<Vec<String>>, SchemaError> {
    debug!(record = %schema.root().name(), payloads = payloads.len(), "validating batch");

    payloads
        .par_iter()
        .map(|payload| validate_against_schema(schema, payload))
        .collect()
}
