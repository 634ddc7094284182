use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::{
    catalog::model::{CatalogItem, CatalogItemId},
    foundation::error::{CharmloomError, CharmloomResult},
    raster::{
        compose::{RasterizerOpts, rasterize},
        fetch::ImageFetcher,
    },
    session::placement::DesignSession,
};

/// Design-creation request accepted by the design persistence collaborator.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CreateDesignRequest {
    /// Owning user, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Display name for the design record.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Archival unenhanced capture, base64-encoded JPEG.
    pub raw_image_base64: String,
    /// Accepted enhanced image reference.
    pub enhanced_image: String,
    /// Catalog identities the design is composed of.
    pub catalog_ids: Vec<CatalogItemId>,
}

/// Created design record returned by the design persistence collaborator.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DesignRecord {
    /// Backend identity of the created design.
    pub id: String,
    /// Price assigned by the backend.
    pub price: f64,
}

/// Order-line append request accepted by the order collaborator.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OrderLineRequest {
    /// Design the line references.
    pub design_id: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price at order time.
    pub unit_price: f64,
    /// Absolute discount applied to the line.
    pub discount: f64,
}

/// Design persistence collaborator.
#[async_trait::async_trait]
pub trait DesignStore: Send + Sync {
    /// Create a design record; returns the created record with its identity
    /// and backend-assigned price.
    async fn create_design(&self, req: &CreateDesignRequest) -> CharmloomResult<DesignRecord>;
}

/// Order-line collaborator appending to the user's in-progress order.
#[async_trait::async_trait]
pub trait OrderLineStore: Send + Sync {
    /// Append one line to the in-progress order.
    async fn append_line(&self, req: &OrderLineRequest) -> CharmloomResult<()>;
}

/// Naming and ownership metadata for a persisted design.
#[derive(Clone, Debug, Default)]
pub struct PersistOpts {
    /// Owning user, when known.
    pub owner_id: Option<String>,
    /// Display name; defaults to "Custom design" when empty.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Capture options used for the archival raw image.
    pub raster: RasterizerOpts,
}

/// Resolve every placement and the chosen template back to their originating
/// catalog items by exact image-reference match.
///
/// Placements no longer carry the catalog id once dropped, only the image
/// they were rendered from. Placements resolve first, in placement order,
/// then the template; duplicates are kept so quantity information survives.
pub fn resolve_identities(session: &DesignSession, catalog: &[CatalogItem]) -> Vec<CatalogItemId> {
    let mut out = Vec::new();
    for placement in session.placements() {
        if let Some(item) = catalog.iter().find(|c| c.image_ref == placement.image_ref) {
            out.push(item.id.clone());
        }
    }
    if let Some(item) = catalog
        .iter()
        .find(|c| c.image_ref == session.template_image())
    {
        out.push(item.id.clone());
    }
    out
}

/// Translate a session with a confirmed enhanced result into backend records:
/// a design record carrying the raw and enhanced images, then an order line
/// referencing it.
///
/// Refuses before any network call when zero catalog identities resolve. A
/// design-creation failure prevents the order-line append entirely; an
/// order-line failure after a successful creation is surfaced as the distinct
/// [`CharmloomError::OrderAppend`] (the design is not rolled back). On full
/// success the session is reset to an empty editable state.
#[tracing::instrument(skip_all, fields(name = %opts.name))]
pub async fn persist_session(
    session: &mut DesignSession,
    catalog: &[CatalogItem],
    fetcher: &dyn ImageFetcher,
    designs: &dyn DesignStore,
    orders: &dyn OrderLineStore,
    opts: &PersistOpts,
) -> CharmloomResult<DesignRecord> {
    let enhanced = session
        .enhanced_image()
        .ok_or_else(|| CharmloomError::validation("session has no enhanced result to persist"))?
        .clone();

    let catalog_ids = resolve_identities(session, catalog);
    if catalog_ids.is_empty() {
        return Err(CharmloomError::identity(
            "design resolves to no catalog items",
        ));
    }

    let raw = rasterize(session, fetcher, &opts.raster)
        .await?
        .ok_or_else(|| CharmloomError::capture("could not capture raw design image"))?;

    let name = if opts.name.trim().is_empty() {
        "Custom design".to_string()
    } else {
        opts.name.clone()
    };

    let record = designs
        .create_design(&CreateDesignRequest {
            owner_id: opts.owner_id.clone(),
            name,
            description: opts.description.clone(),
            raw_image_base64: BASE64.encode(&raw.jpeg),
            enhanced_image: enhanced.as_str().to_string(),
            catalog_ids,
        })
        .await
        .map_err(|err| CharmloomError::persistence(err.to_string()))?;

    orders
        .append_line(&OrderLineRequest {
            design_id: record.id.clone(),
            quantity: 1,
            unit_price: record.price,
            discount: 0.0,
        })
        .await
        .map_err(|err| CharmloomError::OrderAppend {
            design_id: record.id.clone(),
            detail: err.to_string(),
        })?;

    session.reset();
    tracing::info!(design_id = %record.id, "design persisted and order line appended");
    Ok(record)
}

#[cfg(test)]
#[path = "../../tests/unit/persist/coordinator.rs"]
mod tests;
