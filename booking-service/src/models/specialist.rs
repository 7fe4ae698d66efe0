use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Specialist areas that can be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Makeup,
    Sport,
}

impl std::str::FromStr for AreaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "makeup" => Ok(AreaType::Makeup),
            "sport" => Ok(AreaType::Sport),
            _ => Err(format!("Invalid area type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SpecialistSearchQuery {
    #[serde(rename = "type")]
    pub area_type: Option<String>,
    #[serde(alias = "City")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpecialistSearchResponse {
    #[serde(rename = "type")]
    pub area_type: AreaType,
    pub city: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub specialists: Vec<serde_json::Value>,
}
