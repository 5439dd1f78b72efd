use nlb_interruption_core::tags::Tag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescription {
    pub instance_id: String,
    pub state: Option<String>,
    pub tags: Vec<Tag>,
}

pub trait InstanceDirectory {
    /// Fails when the instance does not exist or the id is malformed.
    fn describe_instance(&self, instance_id: &str) -> Result<InstanceDescription, String>;
    fn terminate_instance(&self, instance_id: &str) -> Result<(), String>;
}
