use serde::Serialize;

/// The identity behind the client's credentials.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WhoAmI {
    pub name: String,
    pub tags: Vec<String>,
}

impl WhoAmI {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_administrator(&self) -> bool {
        self.has_tag("administrator")
    }
}
