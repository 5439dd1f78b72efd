pub trait ParameterStore {
    fn get_parameter_value(&self, name: &str) -> Result<String, String>;
}
