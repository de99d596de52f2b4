use std::path::Path;

use anyhow::{anyhow, bail, Result};
use kubetopo_api::resource::ResourceRecord;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, Level};

/// Reads the records of a `kubectl get -o json|yaml` dump.
#[instrument(level = Level::INFO, skip_all, err(Display))]
pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<ResourceRecord>> {
    let path = path.as_ref();
    let content = ::tokio::fs::read_to_string(path)
        .await
        .map_err(|error| anyhow!("failed to read snapshot {path:?}: {error}"))?;

    let records = parse_snapshot(&content)
        .map_err(|error| anyhow!("failed to parse snapshot {path:?}: {error}"))?;
    info!("loaded {} records from {path:?}", records.len());
    Ok(records)
}

/// Parses the records of a snapshot.
///
/// The content is either a JSON document or a stream of YAML documents,
/// each holding a single object or a `List` of objects.
pub fn parse_snapshot(content: &str) -> Result<Vec<ResourceRecord>> {
    let mut records = Vec::default();
    for document in parse_documents(content)? {
        collect(document, &mut records)?;
    }
    Ok(records)
}

fn parse_documents(content: &str) -> Result<Vec<Value>> {
    if let Ok(document) = ::serde_json::from_str(content) {
        return Ok(vec![document]);
    }

    ::serde_yaml::Deserializer::from_str(content)
        .map(|document| {
            Value::deserialize(document).map_err(|error| anyhow!("invalid document: {error}"))
        })
        .collect()
}

fn collect(document: Value, records: &mut Vec<ResourceRecord>) -> Result<()> {
    match document {
        Value::Null => Ok(()),
        Value::Array(items) => items
            .into_iter()
            .try_for_each(|item| collect(item, records)),
        Value::Object(mut object) if is_list(&object) => match object.remove("items") {
            Some(Value::Array(items)) => items
                .into_iter()
                .try_for_each(|item| collect(item, records)),
            Some(_) => bail!("list items should be an array"),
            None => Ok(()),
        },
        Value::Object(object) => {
            let kind = kind_of(&object).unwrap_or_default().to_string();
            match ResourceRecord::from_object(Value::Object(object))? {
                Some(record) => records.push(record),
                None => debug!("skipping unsupported kind: {kind:?}"),
            }
            Ok(())
        }
        _ => bail!("expected a Kubernetes object"),
    }
}

fn kind_of(object: &Map<String, Value>) -> Option<&str> {
    object.get("kind").and_then(Value::as_str)
}

fn is_list(object: &Map<String, Value>) -> bool {
    kind_of(object)
        .map(|kind| kind.ends_with("List"))
        .unwrap_or_default()
}
