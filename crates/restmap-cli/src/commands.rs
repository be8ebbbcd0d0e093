//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use restmap_core::{from_url, to_url, Catalog, SchemaRegistry};
use restmap_proto::Query;

/// Encode a JSON query into a query path.
pub fn encode(
    catalog: &Catalog,
    model: &str,
    query: Option<&str>,
    fields: &[String],
) -> Result<String> {
    check_model(catalog, model)?;
    let query: Option<Query> = query
        .map(serde_json::from_str)
        .transpose()
        .context("invalid query")?;
    Ok(to_url(catalog, model, query.as_ref(), fields)?)
}

/// Decode a query path into JSON.
pub fn decode(catalog: &Catalog, model: &str, path: &str, pretty: bool) -> Result<String> {
    check_model(catalog, model)?;
    let decoded = from_url(catalog, model, path)?;
    let json = if pretty {
        serde_json::to_string_pretty(&decoded)?
    } else {
        serde_json::to_string(&decoded)?
    };
    Ok(json)
}

/// List entity names with their resource paths.
pub fn models(catalog: &Catalog) -> String {
    catalog
        .entity_names()
        .into_iter()
        .map(|name| {
            let storage = catalog.storage_path(name).unwrap_or_default();
            format!("{}\t{}", name, storage)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_model(catalog: &Catalog, model: &str) -> Result<()> {
    if catalog.get_entity(model).is_none() {
        bail!(
            "unknown model '{}' (known: {})",
            model,
            catalog.entity_names().join(", ")
        );
    }
    Ok(())
}
