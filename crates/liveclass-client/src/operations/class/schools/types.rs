use serde::{Deserialize, Serialize};

use super::runner::class_schools_query;

/// Input for the class schools operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassSchoolsInput {
    /// Id of the class to look up.
    pub class_id: String,
    /// Page size for the schools connection.
    pub first: i64,
}

impl From<ClassSchoolsInput> for class_schools_query::Variables {
    fn from(input: ClassSchoolsInput) -> Self {
        class_schools_query::Variables {
            class_id: input.class_id,
            first: Some(input.first),
        }
    }
}

/// Crate-facing shape of the class schools result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClassSchoolsResponse {
    /// Whether the presented credentials authorize the caller.
    pub authorized: bool,
    /// Id of the class that was looked up.
    pub class_id: String,
    /// Display name of the class, when set.
    pub class_name: Option<String>,
    /// Schools connected to the class.
    pub schools: Vec<School>,
}

/// One school connected to a class.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct School {
    /// Id of the school.
    pub id: String,
    /// Display name of the school, when set.
    pub name: Option<String>,
}
