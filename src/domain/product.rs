// ==========================================
// Brand backfill - product brand reference
// ==========================================
// The product table is owned by the target store.
// This tool only reads id + brand FK by product_code
// and only ever writes the brand FK.
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

/// Current value of a product's brand FK column.
///
/// The FK column type differs between schema generations (INTEGER in most,
/// TEXT in some legacy dumps), so the raw value is kept as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BrandRef {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(usize),
}

impl BrandRef {
    /// NULL, empty text and whitespace-only text count as "no brand".
    /// Any number (0 included) is an existing reference.
    pub fn is_blank(&self) -> bool {
        match self {
            BrandRef::Null => true,
            BrandRef::Text(s) => s.trim().is_empty(),
            BrandRef::Integer(_) | BrandRef::Real(_) | BrandRef::Blob(_) => false,
        }
    }
}

/// Product row as seen by the reconciler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBrandRef {
    pub id: ProductId,
    pub brand_ref: BrandRef,
}

impl ProductBrandRef {
    pub fn has_brand(&self) -> bool {
        !self.brand_ref.is_blank()
    }
}
