use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
}

/// Repository metadata as returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RepositoryMetadata {
    pub owner: Owner,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RepositoryMetadata {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

/// Language name to byte count, in the order the API listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageBytes(pub Vec<(String, u64)>);

impl LanguageBytes {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Names of the `limit` largest languages, biggest first.
    /// The sort is stable so equal counts keep their upstream order.
    pub fn top(&self, limit: usize) -> Vec<String> {
        let mut ranked: Vec<&(String, u64)> = self.0.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl<'de> Deserialize<'de> for LanguageBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // serde_json's preserve_order keeps the upstream key order
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        map.into_iter()
            .map(|(name, bytes)| {
                bytes
                    .as_u64()
                    .map(|b| (name.clone(), b))
                    .ok_or_else(|| {
                        serde::de::Error::custom(format!("byte count for {name} is not a number"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(LanguageBytes)
    }
}

// Only the field the star endpoint needs
#[derive(Debug, Deserialize)]
pub(crate) struct StarCountBody {
    pub stargazers_count: serde_json::Value,
}
