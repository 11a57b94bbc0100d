use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EmailTagDTO {
    pub name: String,
    pub value: String,
}

/// Providers send tags either as a list of name/value pairs or as a map
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EmailTagsDTO {
    List(Vec<EmailTagDTO>),
    Map(HashMap<String, String>),
}

impl EmailTagsDTO {
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Self::List(tags) => tags
                .iter()
                .find(|t| t.name == name)
                .map(|t| t.value.as_str()),
            Self::Map(tags) => tags.get(name).map(|v| v.as_str()),
        }
    }
}

/// A single address or a list of them
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RecipientsDTO {
    One(String),
    Many(Vec<String>),
}

impl RecipientsDTO {
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(to) => Some(to.as_str()),
            Self::Many(to) => to.first().map(|to| to.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EmailEventDataDTO {
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub to: Option<RecipientsDTO>,
    #[serde(default)]
    pub tags: Option<EmailTagsDTO>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Anything else the provider sent along
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}
