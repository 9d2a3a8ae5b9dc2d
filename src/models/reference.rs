use serde::{Deserialize, Serialize};

/// Discriminator value marking reference entries in the shared collection.
pub const REFERENCE_KIND: &str = "reference";

/// A recruiting partner. `id` equals the partner's sign-in uid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub target: Option<f64>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Public projection shown in the application form's reference picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub id: String,
    pub name: String,
}

impl From<&Reference> for ReferenceOption {
    fn from(r: &Reference) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
        }
    }
}
