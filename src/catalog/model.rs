use crate::foundation::error::CharmloomResult;

/// Opaque backend identity of a catalog item.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CatalogItemId(pub String);

impl CatalogItemId {
    /// Access the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CatalogItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog item kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Small decorative item that can be placed onto a template.
    Charm,
    /// Base jewelry image onto which charms are arranged.
    Template,
}

/// One item of the read-only charm/template catalog.
///
/// Immutable once fetched; the session cache owns the list for its lifetime.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CatalogItem {
    /// Backend identity.
    pub id: CatalogItemId,
    /// Display name.
    pub name: String,
    /// Charm or template.
    pub category: Category,
    /// Unit price.
    pub price: f64,
    /// Resolvable image reference (URL or path) this item is rendered from.
    pub image_ref: String,
    /// Owning user, when the backend scopes items per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

/// Read-only catalog collaborator.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the available charm/template items.
    async fn list_items(&self) -> CharmloomResult<Vec<CatalogItem>>;
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
