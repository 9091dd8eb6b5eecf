use jsonschema::JSONSchema;
use motor_catalog::pipeline::{build_catalog, discover_documents, BuildOptions, VendorTable};
use serde_json::json;
use std::path::Path;

fn compiled_schema() -> JSONSchema {
    let schema = include_str!("../schemas/motors.v1.json");
    let schema_json: serde_json::Value = serde_json::from_str(schema).unwrap();
    let schema_static: &'static serde_json::Value = Box::leak(Box::new(schema_json));
    JSONSchema::options().compile(schema_static).unwrap()
}

#[test]
fn built_catalog_matches_schema() {
    let resources = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("resources");
    let documents = discover_documents(&resources).unwrap();
    let catalog = build_catalog(&documents, &VendorTable::builtin(), BuildOptions::default()).unwrap();
    let instance: serde_json::Value = serde_json::from_slice(&catalog.to_json().unwrap()).unwrap();

    let compiled = compiled_schema();
    assert!(compiled.is_valid(&instance));
    assert_eq!(instance.as_array().unwrap().len(), 4);
}

#[test]
fn record_without_type_key_is_rejected() {
    let compiled = compiled_schema();
    let invalid = json!([{
        "manufacturer": "estes",
        "name": "C6",
        "diameter": 18.0,
        "length": 70.0,
        "mass": 0.0241,
        "prop_mass": 0.0123,
        "delays": [],
        "avg_thrust": 4.7,
        "peak_thrust": 14.1,
        "burn_time": 1.9,
        "data": [[0.0, 0.0]]
    }]);
    assert!(!compiled.is_valid(&invalid), "tpe is required");
}
