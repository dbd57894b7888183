use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use restkit_core::{ParamInfo, ParamLocation, RouteInfo};

use crate::schema::SchemaRegistry;

/// Configuration for the generated OpenAPI document.
pub struct OpenApiConfig {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

impl OpenApiConfig {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Build an OpenAPI 3.1.0 JSON document from route metadata.
pub fn build_openapi_spec(config: &OpenApiConfig, routes: &[RouteInfo]) -> Value {
    build_openapi_spec_with(config, routes, SchemaRegistry::new())
}

/// Build the document and merge extra hand-registered schemas into
/// `components/schemas`.
pub fn build_openapi_spec_with(
    config: &OpenApiConfig,
    routes: &[RouteInfo],
    extra: SchemaRegistry,
) -> Value {
    let mut paths: Map<String, Value> = Map::new();
    let mut schemas: Map<String, Value> = Map::new();
    let mut hoisted: Vec<(String, Value)> = Vec::new();

    for route in routes {
        let operation = build_operation(route);
        let path_entry = paths.entry(route.path.clone()).or_insert_with(|| json!({}));
        if let Some(obj) = path_entry.as_object_mut() {
            obj.insert(route.method.to_lowercase(), operation);
        }

        if let Some(ref body_type) = route.request_body_type {
            if !schemas.contains_key(body_type) {
                insert_schema(&mut schemas, &mut hoisted, body_type, &route.request_body_schema);
            }
        }
        if let Some(ref resp_type) = route.response_type {
            if !schemas.contains_key(resp_type) {
                insert_schema(&mut schemas, &mut hoisted, resp_type, &route.response_schema);
            }
        }
    }

    // Definitions hoisted out of schemars `$defs` become components of
    // their own; explicit registrations win over hoisted duplicates.
    for (name, mut schema) in hoisted {
        sanitize_schema(&mut schema, &mut Vec::new());
        schemas.entry(name).or_insert(schema);
    }
    for (name, mut schema) in extra.into_schemas() {
        sanitize_schema(&mut schema, &mut Vec::new());
        schemas.insert(name, schema);
    }

    let mut info: Map<String, Value> = Map::new();
    info.insert("title".into(), json!(config.title));
    info.insert("version".into(), json!(config.version));
    if let Some(ref desc) = config.description {
        info.insert("description".into(), json!(desc));
    }

    let mut components: Map<String, Value> = Map::new();
    components.insert(
        "securitySchemes".into(),
        json!({
            "bearerAuth": {
                "type": "http",
                "scheme": "bearer"
            }
        }),
    );
    if !schemas.is_empty() {
        components.insert("schemas".into(), Value::Object(schemas));
    }

    json!({
        "openapi": "3.1.0",
        "info": info,
        "paths": paths,
        "components": components
    })
}

/// A router serving the given document at `GET /openapi.json`.
pub fn openapi_router<S>(spec: Value) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/openapi.json",
        get(move || {
            let spec = spec.clone();
            async move { Json(spec) }
        }),
    )
}

fn build_operation(route: &RouteInfo) -> Value {
    let mut operation: Map<String, Value> = Map::new();
    operation.insert("operationId".into(), json!(route.operation_id));

    if let Some(ref tag) = route.tag {
        operation.insert("tags".into(), json!([tag]));
    }
    if let Some(ref summary) = route.summary {
        operation.insert("summary".into(), json!(summary));
    }
    if let Some(ref description) = route.description {
        operation.insert("description".into(), json!(description));
    }

    let params: Vec<Value> = route.params.iter().map(param_to_value).collect();
    if !params.is_empty() {
        operation.insert("parameters".into(), json!(params));
    }

    if let Some(ref body_type) = route.request_body_type {
        operation.insert(
            "requestBody".into(),
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{body_type}") }
                    }
                }
            }),
        );
    }

    let mut responses: Map<String, Value> = Map::new();
    let status_key = route.response_status.to_string();
    let status_desc = match route.response_status {
        201 => "Created",
        204 => "No content",
        _ => "Successful response",
    };
    match route.response_type {
        Some(ref resp_type) if route.response_status != 204 => {
            responses.insert(
                status_key,
                json!({
                    "description": status_desc,
                    "content": {
                        "application/json": {
                            "schema": { "$ref": format!("#/components/schemas/{resp_type}") }
                        }
                    }
                }),
            );
        }
        _ => {
            responses.insert(status_key, json!({ "description": status_desc }));
        }
    }

    if route.has_auth {
        responses.insert("401".into(), json!({ "description": "Unauthorized" }));
        operation.insert("security".into(), json!([{ "bearerAuth": [] }]));
    }

    operation.insert("responses".into(), Value::Object(responses));
    Value::Object(operation)
}

fn param_to_value(p: &ParamInfo) -> Value {
    let location = match p.location {
        ParamLocation::Path => "path",
        ParamLocation::Query => "query",
    };
    json!({
        "name": p.name,
        "in": location,
        "required": p.required,
        "schema": { "type": p.param_type }
    })
}

/// Insert a route-carried schema into `components/schemas`, hoisting any
/// `$defs` into standalone components.
fn insert_schema(
    schemas: &mut Map<String, Value>,
    hoisted: &mut Vec<(String, Value)>,
    type_name: &str,
    root_schema: &Option<Value>,
) {
    match root_schema {
        Some(root) => {
            let mut schema = root.clone();
            sanitize_schema(&mut schema, hoisted);
            schemas.insert(type_name.to_string(), schema);
        }
        None => {
            schemas.insert(type_name.to_string(), json!({ "type": "object" }));
        }
    }
}

/// Recursively convert a schemars Draft 2020-12 schema into OpenAPI
/// component form.
///
/// Removes `$schema` markers, hoists `$defs` entries (at any depth) into
/// `hoisted`, and rewrites `$ref` paths from `#/$defs/X` to
/// `#/components/schemas/X`.
fn sanitize_schema(value: &mut Value, hoisted: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(obj) => {
            obj.remove("$schema");
            if let Some(Value::Object(defs)) = obj.remove("$defs") {
                for (name, def) in defs {
                    hoisted.push((name, def));
                }
            }
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if ref_str.starts_with("#/$defs/") {
                    *ref_str = ref_str.replace("#/$defs/", "#/components/schemas/");
                }
            }
            for (_, v) in obj.iter_mut() {
                sanitize_schema(v, hoisted);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                sanitize_schema(v, hoisted);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restkit_test::TestApp;

    fn sample_routes() -> Vec<RouteInfo> {
        vec![
            RouteInfo {
                path: "/tasks".into(),
                method: "post".into(),
                operation_id: "task_create".into(),
                summary: Some("Create a task".into()),
                description: None,
                request_body_type: Some("CreateTask".into()),
                request_body_schema: Some(json!({
                    "$schema": "https://json-schema.org/draft/2020-12/schema",
                    "type": "object",
                    "properties": { "title": { "type": "string" } },
                    "required": ["title"]
                })),
                response_type: Some("Task".into()),
                response_schema: Some(json!({
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "status": { "$ref": "#/$defs/Status" }
                    },
                    "$defs": {
                        "Status": { "type": "string", "enum": ["open", "done"] }
                    }
                })),
                response_status: 201,
                params: Vec::new(),
                tag: Some("tasks".into()),
                has_auth: true,
            },
            RouteInfo {
                path: "/tasks/{id}".into(),
                method: "delete".into(),
                operation_id: "task_delete".into(),
                summary: None,
                description: None,
                request_body_type: None,
                request_body_schema: None,
                response_type: None,
                response_schema: None,
                response_status: 204,
                params: vec![ParamInfo {
                    name: "id".into(),
                    location: ParamLocation::Path,
                    param_type: "string".into(),
                    required: true,
                }],
                tag: Some("tasks".into()),
                has_auth: true,
            },
        ]
    }

    #[test]
    fn builds_paths_and_operations() {
        let config = OpenApiConfig::new("Tasks API", "1.0.0");
        let spec = build_openapi_spec(&config, &sample_routes());

        assert_eq!(spec["openapi"], "3.1.0");
        assert_eq!(spec["info"]["title"], "Tasks API");
        let create = &spec["paths"]["/tasks"]["post"];
        assert_eq!(create["operationId"], "task_create");
        assert_eq!(create["tags"][0], "tasks");
        assert_eq!(
            create["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/CreateTask"
        );
        assert!(create["responses"]["201"]["content"].is_object());
        assert!(create["responses"]["401"].is_object());
        assert_eq!(create["security"][0]["bearerAuth"], json!([]));
    }

    #[test]
    fn delete_operation_has_no_response_body() {
        let config = OpenApiConfig::new("Tasks API", "1.0.0");
        let spec = build_openapi_spec(&config, &sample_routes());

        let delete = &spec["paths"]["/tasks/{id}"]["delete"];
        assert!(delete["responses"]["204"]["content"].is_null());
        assert_eq!(delete["parameters"][0]["in"], "path");
    }

    #[test]
    fn hoists_defs_and_rewrites_refs() {
        let config = OpenApiConfig::new("Tasks API", "1.0.0");
        let spec = build_openapi_spec(&config, &sample_routes());

        let schemas = &spec["components"]["schemas"];
        assert!(schemas["CreateTask"].get("$schema").is_none());
        assert_eq!(
            schemas["Task"]["properties"]["status"]["$ref"],
            "#/components/schemas/Status"
        );
        assert_eq!(schemas["Status"]["enum"][0], "open");
    }

    #[test]
    fn extra_schemas_are_merged() {
        let config = OpenApiConfig::new("Tasks API", "1.0.0");
        let mut extra = SchemaRegistry::new();
        extra.register("TaskCreatedEvent", json!({ "type": "object" }));
        let spec = build_openapi_spec_with(&config, &sample_routes(), extra);

        assert!(spec["components"]["schemas"]["TaskCreatedEvent"].is_object());
    }

    #[tokio::test]
    async fn serves_the_document_over_http() {
        let config = OpenApiConfig::new("Tasks API", "1.0.0");
        let spec = build_openapi_spec(&config, &sample_routes());
        let app = TestApp::new(openapi_router(spec));

        let body: Value = app.get("/openapi.json").send().await.assert_ok().json();
        assert_eq!(body["info"]["version"], "1.0.0");
    }
}
