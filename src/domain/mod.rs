// ==========================================
// Brand backfill - domain model
// ==========================================
// Responsibility: entities and value types shared by the layers
// Red line: no data access, no engine logic
// ==========================================

pub mod brand;
pub mod outcome;
pub mod product;
pub mod slug;

pub use brand::{Brand, BrandId};
pub use outcome::{ReconciliationOutcome, RowDisposition, RowFailure, SkipBreakdown, SkipReason};
pub use product::{BrandRef, ProductBrandRef, ProductId};
pub use slug::slugify;
