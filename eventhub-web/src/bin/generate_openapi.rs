//! Write the OpenAPI document to disk as JSON and YAML

use eventhub_web::openapi::{get_openapi_yaml, ApiDoc};
use std::fs;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let docs_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("eventhub-web/docs"));
    fs::create_dir_all(&docs_dir)?;

    let openapi = ApiDoc::openapi();

    let json_path = docs_dir.join("openapi.json");
    fs::write(&json_path, openapi.to_pretty_json()?)?;
    println!("Generated: {}", json_path.display());

    let yaml_path = docs_dir.join("openapi.yaml");
    fs::write(&yaml_path, get_openapi_yaml()?)?;
    println!("Generated: {}", yaml_path.display());

    Ok(())
}
