#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub path: String,
    pub default: bool,
}
