use crate::error::{PersistError, PersistResult};
use crate::store::{MetadataStore, Record, RecordKey};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::types::{AttributeValue, KeysAndAttributes};
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

/// BatchGetItem accepts at most this many keys per request.
const BATCH_GET_LIMIT: usize = 100;

/// DynamoDB metadata store
///
/// Records are stored as string attributes. Batch lookups use BatchGetItem;
/// keys the service leaves unprocessed are reported as absent, not retried.
#[derive(Clone)]
pub struct DynamoMetadataStore {
    client: Client,
}

impl DynamoMetadataStore {
    /// Create a client from a shared SDK configuration
    ///
    /// # Arguments
    /// * `config` - Loaded AWS configuration (region, credentials, retry policy)
    /// * `endpoint_url` - Optional custom endpoint (e.g., "http://localhost:8000"
    ///   for DynamoDB Local)
    pub fn new(config: &SdkConfig, endpoint_url: Option<&str>) -> Self {
        let client = match endpoint_url {
            Some(endpoint) => {
                let dynamo_config = aws_sdk_dynamodb::config::Builder::from(config)
                    .endpoint_url(endpoint)
                    .build();
                Client::from_conf(dynamo_config)
            }
            None => Client::new(config),
        };
        Self { client }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn to_item(record: Record) -> HashMap<String, AttributeValue> {
    record
        .into_iter()
        .map(|(name, value)| (name, AttributeValue::S(value)))
        .collect()
}

fn from_item(item: &HashMap<String, AttributeValue>) -> Record {
    item.iter()
        .filter_map(|(name, value)| match value {
            AttributeValue::S(s) => Some((name.clone(), s.clone())),
            AttributeValue::N(n) => Some((name.clone(), n.clone())),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl MetadataStore for DynamoMetadataStore {
    async fn put_record(&self, table: &str, key: &RecordKey, record: Record) -> PersistResult<()> {
        let start = std::time::Instant::now();
        let mut item = to_item(record);
        item.insert(key.attribute.clone(), AttributeValue::S(key.value.clone()));

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    table = %table,
                    key = %key.value,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "DynamoDB put failed"
                );
                PersistError::Store(e.to_string())
            })?;

        Ok(())
    }

    async fn get_record(&self, table: &str, key: &RecordKey) -> PersistResult<Option<Record>> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .key(key.attribute.clone(), AttributeValue::S(key.value.clone()))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, table = %table, key = %key.value, "DynamoDB get failed");
                PersistError::Store(e.to_string())
            })?;

        Ok(output.item().map(from_item))
    }

    async fn query_by_key_set(
        &self,
        table: &str,
        attribute: &str,
        values: &[String],
    ) -> PersistResult<Vec<Record>> {
        let mut records = Vec::with_capacity(values.len());

        for chunk in values.chunks(BATCH_GET_LIMIT) {
            let keys = chunk
                .iter()
                .map(|value| {
                    HashMap::from([(attribute.to_string(), AttributeValue::S(value.clone()))])
                })
                .collect::<Vec<_>>();

            let request = KeysAndAttributes::builder()
                .set_keys(Some(keys))
                .build()
                .map_err(|e| PersistError::Store(e.to_string()))?;

            let output = self
                .client
                .batch_get_item()
                .request_items(table, request)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        table = %table,
                        count = chunk.len(),
                        "DynamoDB batch get failed"
                    );
                    PersistError::Store(e.to_string())
                })?;

            if let Some(unprocessed) = output
                .unprocessed_keys()
                .and_then(|pending| pending.get(table))
            {
                tracing::warn!(
                    table = %table,
                    unprocessed = unprocessed.keys().len(),
                    "DynamoDB batch get left keys unprocessed"
                );
            }

            if let Some(items) = output.responses().and_then(|responses| responses.get(table)) {
                records.extend(items.iter().map(from_item));
            }
        }

        Ok(records)
    }

    async fn delete_record(&self, table: &str, key: &RecordKey) -> PersistResult<()> {
        self.client
            .delete_item()
            .table_name(table)
            .key(key.attribute.clone(), AttributeValue::S(key.value.clone()))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, table = %table, key = %key.value, "DynamoDB delete failed");
                PersistError::Store(e.to_string())
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_conversion_keeps_string_attributes() {
        let mut record = Record::new();
        record.insert("id".to_string(), "abc".to_string());
        record.insert("type".to_string(), "pdf".to_string());

        let mut item = to_item(record.clone());
        item.insert("flag".to_string(), AttributeValue::Bool(true));

        assert_eq!(from_item(&item), record);
    }
}
