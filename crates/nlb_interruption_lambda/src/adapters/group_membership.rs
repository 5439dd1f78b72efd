pub trait GroupMembership {
    /// Removes `instance_id` from the group. With
    /// `should_decrement_desired_capacity = false` the group keeps its target
    /// size and provisions a replacement.
    fn detach_instance(
        &self,
        instance_id: &str,
        group_name: &str,
        should_decrement_desired_capacity: bool,
    ) -> Result<(), String>;
}
