use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::records::Record;

/// One directory entry with its children (district → city → member)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct DirectoryTreeDto {
    pub id: Uuid,
    /// `district`, `city` or `member`
    pub node_type: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub display_order: Option<i64>,
    pub children: Vec<DirectoryTreeDto>,
}

/// A directory record reduced to what the tree needs
struct Node {
    id: Uuid,
    parent_id: Option<Uuid>,
    dto: DirectoryTreeDto,
}

impl From<&Record> for Node {
    fn from(record: &Record) -> Self {
        let text = |logical: &str| record.get_str(logical).map(str::to_string);
        Node {
            id: record.id,
            parent_id: record
                .get_str("parentId")
                .and_then(|s| Uuid::parse_str(s).ok()),
            dto: DirectoryTreeDto {
                id: record.id,
                node_type: text("nodeType").unwrap_or_default(),
                name: text("name").unwrap_or_default(),
                contact_person: text("contactPerson"),
                phone: text("phone"),
                address: text("address"),
                display_order: record.get("displayOrder").and_then(|v| v.as_i64()),
                children: Vec::new(),
            },
        }
    }
}

impl DirectoryTreeDto {
    /// Build tree from a flat list of directory records.
    ///
    /// Roots are nodes without a parent; nodes whose parent is not in the
    /// list are dropped. Siblings are ordered by `displayOrder` (unset last),
    /// then name.
    pub fn build_tree(records: &[Record]) -> Vec<DirectoryTreeDto> {
        let nodes: Vec<Node> = records.iter().map(Node::from).collect();

        let mut roots: Vec<DirectoryTreeDto> = nodes
            .iter()
            .filter(|n| n.parent_id.is_none())
            .map(|root| Self::build_node(root, &nodes))
            .collect();
        roots.sort_by(Self::sibling_order);
        roots
    }

    fn build_node(node: &Node, all: &[Node]) -> DirectoryTreeDto {
        let mut dto = node.dto.clone();
        dto.children = all
            .iter()
            .filter(|n| n.parent_id == Some(node.id))
            .map(|child| Self::build_node(child, all))
            .collect();
        dto.children.sort_by(Self::sibling_order);
        dto
    }

    fn sibling_order(a: &DirectoryTreeDto, b: &DirectoryTreeDto) -> Ordering {
        match (a.display_order, b.display_order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.name.cmp(&b.name))
    }
}
