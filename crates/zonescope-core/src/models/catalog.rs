use serde::{Deserialize, Serialize};

/// Attribute names the aggregate engine treats specially.
///
/// Everything else in a property bag is handled generically, so the catalog
/// only lists the fields that feed named totals and the grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldCatalog {
    /// Candidate keys for the ZIP group key, in priority order
    pub zip_aliases: Vec<String>,

    /// Female sub-population count
    pub female: String,

    /// Male sub-population count
    pub male: String,

    /// Grade-level enrollment counts
    pub grades: Vec<String>,

    /// Number of schools in the zone
    pub schools: String,

    /// Student/teacher ratio reported per zone
    pub ratio: String,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self {
            zip_aliases: vec!["Zip".to_string(), "ZIP".to_string(), "zip".to_string()],
            female: "Female".to_string(),
            male: "Male".to_string(),
            grades: ["PreK", "KG", "Grade_1", "Grade_2", "Grade_3", "Grade_4", "Grade_5"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            schools: "Schools".to_string(),
            ratio: "Stu_Tchr".to_string(),
        }
    }
}
