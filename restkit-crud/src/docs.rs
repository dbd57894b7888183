use serde_json::Value;

use restkit_core::{ParamInfo, ParamLocation, RouteInfo};

use crate::config::CrudConfig;
use crate::service::CrudService;

/// Produce the API-documentation metadata for the five generated routes.
///
/// Schemas for the create/update payloads, the entity, and the filter come
/// from their `schemars` implementations; the OpenAPI assembler later
/// promotes any `$defs` and rewrites refs.
pub fn describe_crud_routes<Svc: CrudService>(
    base_path: &str,
    config: &CrudConfig,
) -> Vec<RouteInfo> {
    let resource = &config.resource;
    let entity_schema = schema_value::<Svc::Entity>();
    let entity_name = short_type_name::<Svc::Entity>();
    let id_param = ParamInfo {
        name: "id".to_string(),
        location: ParamLocation::Path,
        param_type: "string".to_string(),
        required: true,
    };

    vec![
        RouteInfo {
            path: base_path.to_string(),
            method: "get".to_string(),
            operation_id: format!("{resource}_find"),
            summary: Some(format!("List {resource}s")),
            description: None,
            request_body_type: None,
            request_body_schema: None,
            response_type: Some(format!("{entity_name}List")),
            response_schema: entity_schema.clone().map(|items| {
                serde_json::json!({ "type": "array", "items": items })
            }),
            response_status: 200,
            params: query_params::<Svc::Filter>(),
            tag: config.tag.clone(),
            has_auth: true,
        },
        RouteInfo {
            path: format!("{base_path}/{{id}}"),
            method: "get".to_string(),
            operation_id: format!("{resource}_find_by_id"),
            summary: Some(format!("Fetch a single {resource}")),
            description: None,
            request_body_type: None,
            request_body_schema: None,
            response_type: Some(entity_name.clone()),
            response_schema: entity_schema.clone(),
            response_status: 200,
            params: vec![id_param.clone()],
            tag: config.tag.clone(),
            has_auth: true,
        },
        RouteInfo {
            path: base_path.to_string(),
            method: "post".to_string(),
            operation_id: format!("{resource}_create"),
            summary: Some(config.create.summary.clone()),
            description: config.create.description.clone(),
            request_body_type: Some(short_type_name::<Svc::Create>()),
            request_body_schema: schema_value::<Svc::Create>(),
            response_type: Some(entity_name.clone()),
            response_schema: entity_schema.clone(),
            response_status: config.create_response.status,
            params: Vec::new(),
            tag: config.tag.clone(),
            has_auth: true,
        },
        RouteInfo {
            path: format!("{base_path}/{{id}}"),
            method: "put".to_string(),
            operation_id: format!("{resource}_update"),
            summary: Some(config.update.summary.clone()),
            description: config.update.description.clone(),
            request_body_type: Some(short_type_name::<Svc::Update>()),
            request_body_schema: schema_value::<Svc::Update>(),
            response_type: Some(entity_name),
            response_schema: entity_schema,
            response_status: config.update_response.status,
            params: vec![id_param.clone()],
            tag: config.tag.clone(),
            has_auth: true,
        },
        RouteInfo {
            path: format!("{base_path}/{{id}}"),
            method: "delete".to_string(),
            operation_id: format!("{resource}_delete"),
            summary: Some(format!("Delete a {resource}")),
            description: None,
            request_body_type: None,
            request_body_schema: None,
            response_type: None,
            response_schema: None,
            response_status: 204,
            params: vec![id_param],
            tag: config.tag.clone(),
            has_auth: true,
        },
    ]
}

fn schema_value<T: schemars::JsonSchema>() -> Option<Value> {
    serde_json::to_value(schemars::schema_for!(T)).ok()
}

fn short_type_name<T>() -> String {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("unknown")
        .to_string()
}

/// Turn the filter type's object schema into query-parameter docs.
fn query_params<T: schemars::JsonSchema>() -> Vec<ParamInfo> {
    let Some(schema) = schema_value::<T>() else {
        return Vec::new();
    };

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let Some(props) = schema.get("properties").and_then(|p| p.as_object()) else {
        return Vec::new();
    };

    props
        .iter()
        .map(|(name, prop)| ParamInfo {
            name: name.clone(),
            location: ParamLocation::Query,
            param_type: param_type_of(prop),
            required: required.contains(&name.as_str()),
        })
        .collect()
}

/// Extract a scalar type string from a property schema, skipping the
/// `null` arm that optional fields produce.
fn param_type_of(prop: &Value) -> String {
    match prop.get("type") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(arms)) => arms
            .iter()
            .filter_map(|v| v.as_str())
            .find(|s| *s != "null")
            .unwrap_or("string")
            .to_string(),
        _ => "string".to_string(),
    }
}
