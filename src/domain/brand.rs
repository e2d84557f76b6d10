// ==========================================
// Brand backfill - brand entity
// ==========================================
// Aligned with: brands(id, name, slug)
// Created on demand, never updated or deleted by this tool
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate key of a row in the brand table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(pub i64);

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// Brand
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String, // display name, exact-match lookup key
    pub slug: String, // unique across the brand table
}
