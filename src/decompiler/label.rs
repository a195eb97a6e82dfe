use crate::definition::{ReportGraphNode, ReportNodeData};

/// Canvas caption summarizing a node's configuration.
pub fn node_label(node: &ReportGraphNode) -> String {
    match &node.data {
        ReportNodeData::Entity(entity) if entity.attributes.is_empty() => entity.entity.clone(),
        ReportNodeData::Entity(entity) => {
            format!("{} ({} fields)", entity.entity, entity.attributes.len())
        }
        ReportNodeData::Filter(filter) => {
            format!("Filter ({} conditions)", filter.condition_count())
        }
        ReportNodeData::Link(link) => match &link.relation {
            Some(relation) => {
                let name = if link.alias.is_empty() {
                    &relation.target
                } else {
                    &link.alias
                };
                format!("{name} ({})", relation.direction)
            }
            None => link.alias.clone(),
        },
        ReportNodeData::Transform(transform) => {
            format!("Transform ({} expressions)", transform.expressions.len())
        }
        ReportNodeData::Sheet(sheet) => {
            format!("{} Sheet ({} columns)", sheet.name, sheet.columns.len())
        }
        ReportNodeData::Export(export) => {
            format!("Export {}", export.format.as_str().to_uppercase())
        }
    }
}
