use crate::api::preference::error::PreferenceError;
use crate::database::preference::Preference;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /preferences` and `PUT /preferences/{id}`.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct PreferencePayload {
    pub name: String,
}

impl PreferencePayload {
    /// The trimmed name, rejected when blank or longer than 100 characters.
    pub fn validated_name(&self) -> Result<&str, PreferenceError> {
        validate_name("name", &self.name)
    }
}

/// One entry of `POST /preferences/assign`: a tag name, an existing id, or both.
/// When a name is given it wins and is resolved by name.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct PreferenceSpec {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
}

/// How a single spec is resolved to a preference row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpecTarget<'a> {
    ByName(&'a str),
    ById(i32),
}

impl PreferenceSpec {
    pub fn target(&self, index: usize) -> Result<SpecTarget<'_>, PreferenceError> {
        match (&self.name, self.id) {
            (Some(name), _) if !name.trim().is_empty() => {
                validate_name(&format!("[{index}].name"), name).map(SpecTarget::ByName)
            }
            (_, Some(id)) => Ok(SpecTarget::ById(id)),
            _ => Err(PreferenceError::validation(
                format!("[{index}]"),
                "a preference name or id is required",
            )),
        }
    }
}

fn validate_name<'a>(field: &str, name: &'a str) -> Result<&'a str, PreferenceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PreferenceError::validation(field, "is required"));
    }
    if name.chars().count() > 100 {
        return Err(PreferenceError::validation(
            field,
            "must be at most 100 characters",
        ));
    }
    Ok(name)
}

/// Result of an assignment: the preferences named in the request and the caller's full set.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct AssignedPreferences {
    pub assigned: Vec<Preference>,
    pub preferences: Vec<Preference>,
}
