use utoipa::{Modify, OpenApi};

use crate::features::directory::{dtos as directory_dtos, handlers as directory_handlers};
use crate::features::records::{
    dtos as records_dtos, handlers as records_handlers, model as records_model,
    schema as records_schema, ErrorKind,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Records
        records_handlers::list_records,
        records_handlers::create_record,
        records_handlers::get_record,
        records_handlers::update_record,
        records_handlers::delete_record,
        // Directory
        directory_handlers::get_directory_tree,
    ),
    components(
        schemas(
            // Shared
            Meta,
            ErrorKind,
            // Records
            records_schema::EntityKind,
            records_model::Record,
            records_dtos::RecordFormDto,
            ApiResponse<records_model::Record>,
            ApiResponse<Vec<records_model::Record>>,
            // Directory
            directory_dtos::DirectoryTreeDto,
            ApiResponse<Vec<directory_dtos::DirectoryTreeDto>>,
        )
    ),
    tags(
        (name = "records", description = "Announcements, members, messages and directory nodes"),
        (name = "directory", description = "Community directory tree"),
    ),
    info(
        title = "Community Hub API",
        version = "0.1.0",
        description = "API documentation for the community hub back office",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_record_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/{entity}"));
        assert!(doc.paths.paths.contains_key("/api/{entity}/{id}"));
        assert!(doc.paths.paths.contains_key("/api/directory/tree"));
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Hub".to_string(),
            version: "9.9.9".to_string(),
            description: "d".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Hub");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
