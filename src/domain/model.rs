use serde::{Deserialize, Deserializer, Serialize};

/// Catalog record in its persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_aisle")]
    pub aisle: Option<u32>,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub subsection: String,
}

/// Catalog record as the storefront sees it: the persisted `section` is
/// exposed as `category` and `subsection` as `section`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub section: String,
    pub aisle: Option<u32>,
}

impl From<&StoredItem> for ApiItem {
    fn from(item: &StoredItem) -> Self {
        let section = if item.subsection.is_empty() {
            item.section.clone()
        } else {
            item.subsection.clone()
        };

        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            category: item.section.clone(),
            section,
            aisle: item.aisle,
        }
    }
}

impl From<StoredItem> for ApiItem {
    fn from(item: StoredItem) -> Self {
        Self::from(&item)
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "lenient_aisle")]
    pub aisle: Option<u32>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ItemDraft {
    pub fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    pub fn category(&self) -> Option<&str> {
        non_blank(&self.category)
    }

    pub fn section(&self) -> Option<&str> {
        non_blank(&self.section)
    }

    /// Converts the draft into its persisted shape.
    ///
    /// `category` and `section` fall back on each other, a missing or zero
    /// aisle becomes `default_aisle` and a missing price becomes zero.
    /// Validation is the caller's job; see [`crate::core::catalog`].
    pub fn into_stored(self, id: String, default_aisle: u32) -> StoredItem {
        let category = self.category().map(str::to_string);
        let section = self.section().map(str::to_string);
        let name = self.name().unwrap_or_default().to_string();

        StoredItem {
            id,
            name,
            price: self.price.unwrap_or(0.0),
            aisle: Some(self.aisle.filter(|a| *a > 0).unwrap_or(default_aisle)),
            section: category.clone().or_else(|| section.clone()).unwrap_or_default(),
            subsection: section.or(category).unwrap_or_default(),
        }
    }
}

/// Identifiers picked by a shopper. Order is irrelevant, duplicates and
/// unknown ids are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    #[serde(rename = "itemIds")]
    pub item_ids: Vec<String>,
}

impl SelectionRequest {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            item_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.item_ids.iter().any(|selected| selected == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredCatalog {
    pub items: Vec<ApiItem>,
    pub sections: Vec<String>,
    pub subsections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Principal,
}

/// Accepts non-negative integers, integral floats and numeric strings.
/// Everything else decodes as `None` instead of failing the record.
pub fn lenient_aisle<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(aisle_from_value))
}

pub fn aisle_from_value(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u32)
            }
        }
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
