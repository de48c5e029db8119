//! Wire shapes of graph requests and responses exchanged with the server.
//!
//! Every object carries its kind in an `@type` field. Kinds this tool does
//! not know about are kept verbatim in the `Other` variants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Object ids keyed by type name, e.g. `{"Dataset": [50]}`.
pub type ObjectIds = BTreeMap<String, Vec<i64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Request {
    #[serde(rename = "omero.cmd.Duplicate")]
    Duplicate(Duplicate),
    #[serde(rename = "omero.cmd.SkipHead")]
    SkipHead(SkipHead),
    #[serde(rename = "omero.cmd.DoAll")]
    DoAll(DoAll),
    #[serde(untagged)]
    Other(serde_json::Value),
}

/// The concrete duplication request. The three `types_to_*` fields stay
/// `None` (and off the wire) unless classification was given for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Duplicate {
    #[serde(default)]
    pub target_objects: ObjectIds,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types_to_duplicate: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types_to_reference: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types_to_ignore: Option<Vec<String>>,
}

/// Runs `request` on the descendants of `target_objects` of the types in
/// `start_from`, leaving the targets themselves alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipHead {
    #[serde(default)]
    pub target_objects: ObjectIds,
    #[serde(default)]
    pub start_from: Vec<String>,
    pub request: Box<Request>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoAll {
    #[serde(default)]
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Response {
    #[serde(rename = "omero.cmd.DuplicateResponse")]
    Duplicate(DuplicateResponse),
    #[serde(rename = "omero.cmd.DoAllRsp")]
    DoAll(DoAllResponse),
    #[serde(rename = "omero.cmd.ERR")]
    Error(ErrorResponse),
    #[serde(untagged)]
    Other(serde_json::Value),
}

/// Newly created object ids keyed by type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateResponse {
    #[serde(default)]
    pub duplicates: ObjectIds,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoAllResponse {
    #[serde(default)]
    pub responses: Vec<Response>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl Response {
    pub const DUPLICATE_TYPE: &'static str = "omero.cmd.DuplicateResponse";
    pub const DO_ALL_TYPE: &'static str = "omero.cmd.DoAllRsp";
    pub const ERROR_TYPE: &'static str = "omero.cmd.ERR";

    /// `@type` of a reply kept as raw JSON whose kind is one this tool
    /// parses. Such a reply had a body that did not fit its shape.
    pub fn unreadable_kind(&self) -> Option<&str> {
        let Response::Other(value) = self else {
            return None;
        };
        let kind = value.get("@type")?.as_str()?;
        [Self::DUPLICATE_TYPE, Self::DO_ALL_TYPE, Self::ERROR_TYPE]
            .contains(&kind)
            .then_some(kind)
    }
}
