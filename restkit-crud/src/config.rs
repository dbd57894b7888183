/// API-documentation metadata for one generated operation.
#[derive(Debug, Clone)]
pub struct OperationDoc {
    pub summary: String,
    pub description: Option<String>,
}

impl OperationDoc {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// API-documentation metadata for one generated response.
#[derive(Debug, Clone)]
pub struct ResponseDoc {
    pub status: u16,
    pub description: String,
}

impl ResponseDoc {
    pub fn new(status: u16, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
        }
    }
}

/// Configuration consumed by the controller factory.
///
/// Everything here is documentation metadata for the create/update routes;
/// none of it affects runtime routing. The config is consumed once at
/// route-registration time.
#[derive(Debug, Clone)]
pub struct CrudConfig {
    /// Singular resource name, used for operation ids and messages.
    pub resource: String,
    pub tag: Option<String>,
    pub create: OperationDoc,
    pub create_response: ResponseDoc,
    pub update: OperationDoc,
    pub update_response: ResponseDoc,
}

impl CrudConfig {
    /// Sensible documentation defaults for a resource name.
    pub fn new(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self {
            create: OperationDoc::new(format!("Create a {resource}")),
            create_response: ResponseDoc::new(201, format!("The created {resource}")),
            update: OperationDoc::new(format!("Update a {resource}")),
            update_response: ResponseDoc::new(200, format!("The updated {resource}")),
            tag: None,
            resource,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_create(mut self, doc: OperationDoc, response: ResponseDoc) -> Self {
        self.create = doc;
        self.create_response = response;
        self
    }

    pub fn with_update(mut self, doc: OperationDoc, response: ResponseDoc) -> Self {
        self.update = doc;
        self.update_response = response;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_resource_name() {
        let config = CrudConfig::new("task").with_tag("tasks");
        assert_eq!(config.create.summary, "Create a task");
        assert_eq!(config.create_response.status, 201);
        assert_eq!(config.update_response.status, 200);
        assert_eq!(config.tag.as_deref(), Some("tasks"));
    }
}
