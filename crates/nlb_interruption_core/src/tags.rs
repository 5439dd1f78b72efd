use serde::{Deserialize, Serialize};

pub const AUTOSCALING_GROUP_TAG: &str = "aws:autoscaling:groupName";
pub const NAME_TAG: &str = "Name";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Returns the value of the first tag whose key matches exactly.
pub fn get_tag_value<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.key == key)
        .map(|tag| tag.value.as_str())
}

/// Owning autoscaling group, if any. An empty group name counts as absent.
pub fn autoscaling_group_name(tags: &[Tag]) -> Option<&str> {
    get_tag_value(tags, AUTOSCALING_GROUP_TAG).filter(|name| !name.is_empty())
}

pub fn nlb_name_marker(project: &str) -> String {
    format!("{project}-nlb")
}

/// Substring containment, not equality: `myproj-nlb-02` and
/// `staging-myproj-nlb` both qualify for project `myproj`.
pub fn is_nlb_node(name: &str, project: &str) -> bool {
    name.contains(&nlb_name_marker(project))
}
