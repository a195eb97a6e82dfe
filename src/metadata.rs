//! The metadata collaborator: entity, attribute and relationship discovery.
//!
//! The compiler never consults metadata. Editors use it to offer choices and
//! to fill a link node's relation from the relationship the user picked.

use crate::definition::RelationDirection;
use crate::graph::UiRelation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub logical_name: String,
    pub display_name: String,
    pub primary_id: String,
    pub primary_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    DateTime,
    Lookup,
    OptionSet,
    Integer,
    Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeMetadata {
    pub logical_name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    /// Entities a lookup attribute may point at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
}

/// A one-to-many or many-to-one relationship as seen from one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipMetadata {
    pub schema_name: String,
    pub referencing_attribute: String,
    pub referenced_entity: String,
    pub referenced_attribute: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManyToManyRelationship {
    pub schema_name: String,
    pub entity1: String,
    pub entity2: String,
    pub intersect_entity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationships {
    #[serde(default)]
    pub many_to_one: Vec<RelationshipMetadata>,
    #[serde(default)]
    pub one_to_many: Vec<RelationshipMetadata>,
    #[serde(default)]
    pub many_to_many: Vec<ManyToManyRelationship>,
}

/// Attributes and relationships of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityGraph {
    #[serde(default)]
    pub attributes: Vec<AttributeMetadata>,
    #[serde(default)]
    pub relationships: Relationships,
}

/// Narrow lookup contract of the metadata backend.
pub trait MetadataProvider {
    fn entities(&self) -> Vec<EntityMetadata>;
    fn entity_graph(&self, logical_name: &str) -> Option<EntityGraph>;
}

/// A metadata catalog held in memory, e.g. loaded from a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InMemoryMetadata {
    #[serde(default)]
    pub entities: Vec<EntityMetadata>,
    #[serde(default)]
    pub graphs: BTreeMap<String, EntityGraph>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity: EntityMetadata, graph: EntityGraph) -> Self {
        self.graphs.insert(entity.logical_name.clone(), graph);
        self.entities.push(entity);
        self
    }
}

impl MetadataProvider for InMemoryMetadata {
    fn entities(&self) -> Vec<EntityMetadata> {
        self.entities.clone()
    }

    fn entity_graph(&self, logical_name: &str) -> Option<EntityGraph> {
        self.graphs.get(logical_name).cloned()
    }
}

impl UiRelation {
    /// Lookup from the current entity to a parent record.
    pub fn from_many_to_one(relationship: &RelationshipMetadata) -> Self {
        UiRelation {
            kind: RelationDirection::ManyToOne,
            schema_name: relationship.schema_name.clone(),
            from: relationship.referencing_attribute.clone(),
            to: relationship.referenced_attribute.clone(),
            target: relationship.referenced_entity.clone(),
        }
    }

    /// Collection of child records pointing back at the current entity.
    pub fn from_one_to_many(relationship: &RelationshipMetadata) -> Self {
        UiRelation {
            kind: RelationDirection::OneToMany,
            schema_name: relationship.schema_name.clone(),
            from: relationship.referenced_attribute.clone(),
            to: relationship.referencing_attribute.clone(),
            target: relationship.referenced_entity.clone(),
        }
    }

    /// Many-to-many through the intersect entity. `from` is the side the
    /// report starts at, `target` the opposite side.
    pub fn from_many_to_many(relationship: &ManyToManyRelationship, from_entity: &str) -> Self {
        let target = if relationship.entity1 == from_entity {
            &relationship.entity2
        } else {
            &relationship.entity1
        };
        UiRelation {
            kind: RelationDirection::ManyToMany,
            schema_name: relationship.schema_name.clone(),
            from: from_entity.to_string(),
            to: relationship.intersect_entity.clone(),
            target: target.clone(),
        }
    }
}

/// Every relation a link node starting at `entity` could follow, in
/// many-to-one, one-to-many, many-to-many order. Empty for unknown entities.
pub fn candidate_relations(provider: &impl MetadataProvider, entity: &str) -> Vec<UiRelation> {
    let Some(graph) = provider.entity_graph(entity) else {
        log::debug!("No metadata for entity '{entity}'");
        return Vec::new();
    };

    let relationships = &graph.relationships;
    relationships
        .many_to_one
        .iter()
        .map(UiRelation::from_many_to_one)
        .chain(relationships.one_to_many.iter().map(UiRelation::from_one_to_many))
        .chain(
            relationships
                .many_to_many
                .iter()
                .map(|r| UiRelation::from_many_to_many(r, entity)),
        )
        .collect()
}

/// Finds the relation with `schema_name` among [`candidate_relations`].
pub fn find_relation(
    provider: &impl MetadataProvider,
    entity: &str,
    schema_name: &str,
) -> Option<UiRelation> {
    candidate_relations(provider, entity)
        .into_iter()
        .find(|r| r.schema_name == schema_name)
}
