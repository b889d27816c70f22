//! Port trait definitions
//!
//! These traits define the collaborators the explorer session depends on.

use crate::error::Result;
use crate::models::Feature;

/// Port for converting raw source buffers into features
pub trait FeatureDecoder {
    /// Decode a geometry buffer and its matching attribute buffer.
    ///
    /// Fails with `ZonescopeError::Decode` when the buffers are malformed or
    /// do not describe the same records.
    fn decode(&self, geometry: &[u8], attributes: &[u8]) -> Result<Vec<Feature>>;
}

/// Port for persisting the decoded feature collection between sessions
pub trait FeatureCache {
    /// Persist the collection, replacing any previous entry
    fn save(&self, features: &[Feature]) -> Result<()>;

    /// Load the cached collection.
    ///
    /// Returns `Ok(None)` when nothing is cached or the entry has expired.
    fn load(&self) -> Result<Option<Vec<Feature>>>;

    /// Remove the cached entry, if any
    fn clear(&self) -> Result<()>;
}

impl<C: FeatureCache + ?Sized> FeatureCache for Box<C> {
    fn save(&self, features: &[Feature]) -> Result<()> {
        (**self).save(features)
    }

    fn load(&self) -> Result<Option<Vec<Feature>>> {
        (**self).load()
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
