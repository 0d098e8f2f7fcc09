//! JSON:API document codec
//!
//! Resource types describe their wire shape with serde attributes on an
//! attribute struct (kebab-case names, optional fields skipped when absent)
//! and tag it with [`JsonApiType`]. Together these form the per-type schema
//! table used to build request documents and decode responses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, TfeError};

/// Binds an attribute struct to its JSON:API `type` tag
pub trait JsonApiType {
    const TYPE: &'static str;
}

/// Untyped relationships keyed by relation name
pub type Relationships = BTreeMap<String, Relationship>;

/// Links object, kept verbatim
///
/// Values are usually strings; link objects with an `href` are accepted too.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, serde_json::Value>);

impl Links {
    /// Get a link URL by relation name
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.0.get(name)? {
            serde_json::Value::String(s) => Some(s.as_str()),
            serde_json::Value::Object(o) => o.get("href").and_then(|h| h.as_str()),
            _ => None,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.0
            .insert(name.into(), serde_json::Value::String(url.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw map as sent by the server
    pub fn as_map(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.0
    }
}

/// `{type, id}` pair pointing at another resource
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Identifier for a resource whose attribute type is `A`
    pub fn of<A: JsonApiType>(id: impl Into<String>) -> Self {
        Self::new(A::TYPE, id)
    }
}

/// Linkage of a relationship: to-one or to-many
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RelationshipData {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// Relationship object
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<RelationshipData>,
    #[serde(default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl Relationship {
    pub fn to_one(identifier: ResourceIdentifier) -> Self {
        Self {
            data: Some(RelationshipData::One(identifier)),
            links: Links::default(),
        }
    }

    pub fn to_many(identifiers: impl IntoIterator<Item = ResourceIdentifier>) -> Self {
        Self {
            data: Some(RelationshipData::Many(identifiers.into_iter().collect())),
            links: Links::default(),
        }
    }

    /// Identifier of a to-one relationship
    pub fn identifier(&self) -> Option<&ResourceIdentifier> {
        match self.data.as_ref()? {
            RelationshipData::One(identifier) => Some(identifier),
            RelationshipData::Many(_) => None,
        }
    }

    /// ID of a to-one relationship
    pub fn id(&self) -> Option<&str> {
        self.identifier().map(|i| i.id.as_str())
    }

    /// Identifiers of the relationship, whichever its arity
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match self.data.as_ref() {
            Some(RelationshipData::One(identifier)) => vec![identifier],
            Some(RelationshipData::Many(list)) => list.iter().collect(),
            None => Vec::new(),
        }
    }
}

fn is_empty_object<T: Serialize>(value: &T) -> bool {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => map.is_empty(),
        Ok(serde_json::Value::Null) => true,
        _ => false,
    }
}

/// Resource object with typed attributes and relationships
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Resource<A, R = Relationships> {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub attributes: A,
    #[serde(default, skip_serializing_if = "is_empty_object")]
    pub relationships: R,
    #[serde(default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl<A: JsonApiType, R: Default> Resource<A, R> {
    /// New resource for a request body (no id yet)
    pub fn new(attributes: A) -> Self {
        Self {
            kind: A::TYPE.to_string(),
            id: String::new(),
            attributes,
            relationships: R::default(),
            links: Links::default(),
        }
    }
}

impl<A, R> Resource<A, R> {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_relationships(mut self, relationships: R) -> Self {
        self.relationships = relationships;
        self
    }

    /// `{type, id}` of this resource
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.kind.clone(), self.id.clone())
    }
}

/// Top-level JSON:API document carrying `data`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Document<D> {
    pub data: D,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Resource<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<D> Document<D> {
    pub fn new(data: D) -> Self {
        Self {
            data,
            included: Vec::new(),
            links: Links::default(),
            meta: None,
        }
    }

    /// Pagination block of `meta`, if the endpoint is paginated
    pub fn pagination(&self) -> Option<&Pagination> {
        self.meta.as_ref().and_then(|m| m.pagination.as_ref())
    }

    /// Find an included resource and decode it into a typed resource
    pub fn resolve<A, R>(&self, identifier: &ResourceIdentifier) -> Result<Option<Resource<A, R>>>
    where
        A: DeserializeOwned + Default,
        R: DeserializeOwned + Default,
    {
        resolve_included(&self.included, identifier)
    }

    /// Resolve a to-one relationship against `included`
    pub fn resolve_relationship<A, R>(
        &self,
        relationship: Option<&Relationship>,
    ) -> Result<Option<Resource<A, R>>>
    where
        A: DeserializeOwned + Default,
        R: DeserializeOwned + Default,
    {
        match relationship.and_then(|r| r.identifier()) {
            Some(identifier) => self.resolve(identifier),
            None => Ok(None),
        }
    }
}

/// Find `identifier` among side-loaded resources and decode it
pub fn resolve_included<A, R>(
    included: &[Resource<serde_json::Value>],
    identifier: &ResourceIdentifier,
) -> Result<Option<Resource<A, R>>>
where
    A: DeserializeOwned + Default,
    R: DeserializeOwned + Default,
{
    let Some(found) = included
        .iter()
        .find(|r| r.kind == identifier.kind && r.id == identifier.id)
    else {
        return Ok(None);
    };

    let raw = serde_json::to_value(found)?;
    serde_json::from_value(raw.clone())
        .map(Some)
        .map_err(|e| TfeError::Decode {
            message: format!("included {} '{}': {}", identifier.kind, identifier.id, e),
            body: raw.to_string(),
        })
}

/// Document `meta` object
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

fn first_page() -> u32 {
    1
}

/// Pagination details from `meta.pagination`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Pagination {
    #[serde(default = "first_page", alias = "current_page")]
    pub current_page: u32,
    #[serde(default, alias = "prev_page")]
    pub prev_page: Option<u32>,
    #[serde(default, alias = "next_page")]
    pub next_page: Option<u32>,
    #[serde(default, alias = "total_pages")]
    pub total_pages: u32,
    #[serde(default, alias = "total_count")]
    pub total_count: u32,
}

/// Error document: `{"errors": [...]}`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ErrorDocument {
    #[serde(default)]
    pub errors: Vec<ErrorObject>,
}

impl ErrorDocument {
    /// Parse an error envelope; `None` when the body carries no errors
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ErrorDocument>(body)
            .ok()
            .filter(|doc| !doc.errors.is_empty())
    }

    /// Human-readable message: details, falling back to titles
    pub fn message(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|e| e.detail.as_deref().or(e.title.as_deref()))
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    /// Field named by the first error that points at one
    pub fn field(&self) -> Option<String> {
        self.errors.iter().find_map(|e| e.field())
    }
}

/// Single JSON:API error object
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ErrorObject {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub source: Option<ErrorSource>,
}

impl ErrorObject {
    /// Attribute or parameter the error refers to
    ///
    /// `/data/attributes/name` yields `name`.
    pub fn field(&self) -> Option<String> {
        let source = self.source.as_ref()?;
        if let Some(pointer) = source.pointer.as_deref() {
            let last = pointer.rsplit('/').next().unwrap_or_default();
            if !last.is_empty() && last != "data" {
                return Some(last.to_string());
            }
        }
        source.parameter.clone()
    }
}

/// Source of an error object
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ErrorSource {
    #[serde(default)]
    pub pointer: Option<String>,
    #[serde(default)]
    pub parameter: Option<String>,
}
