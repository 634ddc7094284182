//! Charmloom is the compositing and result-normalization engine behind a
//! custom jewelry designer.
//!
//! A shopper arranges charm images on a base template, the live layout is
//! flattened into a single image, an external AI service blends the charms
//! into the template photorealistically, and the accepted result becomes a
//! persisted design plus a cart line.
//!
//! # Pipeline overview
//!
//! 1. **Place**: [`DesignSession`] holds clamped, square placements over a
//!    canvas; [`GestureTracker`] drives drag/resize from pointer snapshots.
//! 2. **Rasterize**: [`rasterize`] fetches every constituent image
//!    concurrently, joins on the full set, and flattens the layout to JPEG.
//! 3. **Enhance**: [`EnhancementClient`] submits the capture as a multipart
//!    upload and returns the raw reply untouched.
//! 4. **Normalize**: [`normalize`] extracts a usable image reference from a
//!    reply whose shape is not contractually fixed.
//! 5. **Persist**: [`persist_session`] maps placements back to catalog
//!    identities and creates the design record and order line.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Clamped, never rejected**: placement mutations have no invalid input
//!   state; bound violations are silently clamped.
//! - **Recoverable failures**: every error in [`CharmloomError`] leaves the
//!   session usable; the user may retry.
//! - **Re-entrant captures**: each rasterization owns its buffer, so
//!   concurrent captures never interfere.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod enhance;
mod foundation;
mod persist;
mod raster;
mod session;

pub use catalog::model::{CatalogItem, CatalogItemId, CatalogSource, Category};
pub use enhance::client::{DEFAULT_PROMPT, EnhancementClient};
pub use enhance::normalize::{NormalizedImage, RawServiceReply, normalize};
pub use foundation::core::{CanvasSize, Point, Vec2};
pub use foundation::error::{CharmloomError, CharmloomResult};
pub use persist::coordinator::{
    CreateDesignRequest, DesignRecord, DesignStore, OrderLineRequest, OrderLineStore, PersistOpts,
    persist_session, resolve_identities,
};
pub use raster::compose::{RasterImage, RasterizerOpts, rasterize};
pub use raster::fetch::{HttpImageFetcher, ImageFetcher};
pub use session::gesture::{Gesture, GestureTracker};
pub use session::placement::{
    DEFAULT_PLACEMENT_SIDE, DesignSession, MIN_PLACEMENT_SIDE, PlacedAccessory, PlacementId,
};
