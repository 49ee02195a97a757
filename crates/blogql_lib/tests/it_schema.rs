//! The exposed GraphQL object types must match the declared entity schemas
//! field for field.

use std::collections::BTreeMap;

use blogql_lib::graphql_api::api_schema_builder;
use blogql_store::entity::{schemas, Cardinality, ScalarType};

/// Field name to type, for the object type `name` in `sdl`.
fn object_fields(sdl: &str, name: &str) -> BTreeMap<String, String> {
    let header = format!("type {name} {{");
    let body = sdl
        .split(&header)
        .nth(1)
        .unwrap_or_else(|| panic!("no type {name} in SDL"))
        .split("\n}")
        .next()
        .unwrap();

    let mut fields = BTreeMap::new();
    let mut in_description = false;
    for line in body.lines().map(str::trim) {
        if line.starts_with("\"\"\"") {
            let one_liner = line.len() > 6 && line.ends_with("\"\"\"");
            if !one_liner {
                in_description = !in_description;
            }
            continue;
        }
        if in_description || line.is_empty() || line.starts_with('"') {
            continue;
        }
        if let Some((field, ty)) = line.split_once(':') {
            fields.insert(field.trim().to_string(), ty.trim().to_string());
        }
    }
    fields
}

fn scalar_type_name(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Id | ScalarType::String => "String",
        ScalarType::Boolean => "Boolean",
        ScalarType::Int => "Int",
        ScalarType::Timestamp => "DateTime",
    }
}

#[test]
fn object_types_match_entity_schemas() {
    let sdl = api_schema_builder().finish().sdl();

    for entity in schemas() {
        let mut expected = BTreeMap::new();
        for scalar in entity.scalars {
            let bang = if scalar.nullable { "" } else { "!" };
            expected.insert(
                scalar.name.to_string(),
                format!("{}{}", scalar_type_name(scalar.ty), bang),
            );
        }
        for relation in entity.relations {
            // Relations are always nullable so that a failed lookup doesn't
            // take its siblings down with it.
            let ty = match relation.cardinality {
                Cardinality::OneNullable | Cardinality::OneRequired => relation.target.to_string(),
                Cardinality::Many => format!("[{}!]", relation.target),
            };
            expected.insert(relation.name.to_string(), ty);
        }

        assert_eq!(object_fields(&sdl, entity.name), expected, "{}", entity.name);
    }
}

#[test]
fn every_operation_takes_a_single_data_argument() {
    let sdl = api_schema_builder().finish().sdl();

    for root in ["QueryRoot", "MutationRoot"] {
        let fields = object_fields(&sdl, root);
        assert!(!fields.is_empty());
        // Fields with arguments show up as `name(data` since the argument
        // list contains the first colon.
        for field in fields.keys() {
            if field.starts_with("all") {
                assert!(!field.contains('('), "{field}");
            } else {
                assert!(field.ends_with("(data"), "{field}");
            }
        }
    }
}
