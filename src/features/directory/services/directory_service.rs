use std::sync::Arc;

use crate::features::directory::dtos::DirectoryTreeDto;
use crate::features::records::error::Result;
use crate::features::records::{CrudEngine, DirectoryNodeService, ListFilter};

/// Read-side views over directory nodes
pub struct DirectoryService {
    nodes: DirectoryNodeService,
}

impl DirectoryService {
    pub fn new(engine: Arc<CrudEngine>) -> Self {
        Self {
            nodes: DirectoryNodeService::new(engine),
        }
    }

    /// All active nodes as a district → city → member tree
    pub async fn tree(&self) -> Result<Vec<DirectoryTreeDto>> {
        let nodes = self.nodes.list(ListFilter::new()).await?;
        tracing::debug!("Building directory tree from {} nodes", nodes.len());
        Ok(DirectoryTreeDto::build_tree(&nodes))
    }
}
