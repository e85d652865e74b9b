use serde::{Deserialize, Deserializer, Serialize};

/// Custom deserializer: treats an explicit `null` list as empty
fn deserialize_nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub readable_id: String,
    pub status: String,
}

impl Collection {
    /// Route of the collection detail view
    pub fn detail_path(&self) -> String {
        format!("/collections/{}", self.readable_id)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_list")]
    pub labels: Vec<String>,
}

impl Source {
    /// Case-insensitive match against either the display name or the short name.
    pub fn matches_service_name(&self, service_name: &str) -> bool {
        let wanted = service_name.to_lowercase();
        self.name.to_lowercase() == wanted || self.short_name.to_lowercase() == wanted
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConnection {
    pub id: String,
    pub name: String,
    pub short_name: String,
    /// Id of the owning collection
    pub collection: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiKey {
    pub decrypted_key: String,
}

impl ApiKey {
    /// Key with everything but the last four characters hidden.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.decrypted_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}
