// ==========================================
// Brand backfill - target schema description
// ==========================================
// Table names and candidate column labels.
// Candidates are in priority order; the first one present wins.
// ==========================================

use serde::Deserialize;

/// Fallback when the catalog declares no length for slug/name
pub const DEFAULT_MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetSchema {
    // ===== product table =====
    pub product_table: String,
    pub product_code_column: String,
    /// Historical names of the brand FK column
    pub brand_fk_candidates: Vec<String>,

    // ===== brand table =====
    pub brand_table: String,

    // ===== input table labels =====
    pub code_column_candidates: Vec<String>,
    pub brand_column_candidates: Vec<String>,

    pub default_slug_max_len: usize,
    pub default_name_max_len: usize,
}

impl Default for TargetSchema {
    fn default() -> Self {
        Self {
            product_table: "products".to_string(),
            product_code_column: "product_code".to_string(),
            brand_fk_candidates: to_strings(&["brand_id", "brandId", "brand"]),
            brand_table: "brands".to_string(),
            code_column_candidates: to_strings(&[
                "Mã hàng hóa",
                // same label typed with combining marks
                "Ma\u{300} ha\u{300}ng ho\u{301}a",
                "Ma hang hoa",
                "MaHangHoa",
                "productCode",
                "product_code",
                "MaHH",
            ]),
            brand_column_candidates: to_strings(&[
                "Nhãn hàng",
                "Nha\u{303}n ha\u{300}ng",
                "Brand",
                "brand",
                "Nhãn_hàng",
            ]),
            default_slug_max_len: DEFAULT_MAX_TEXT_LEN,
            default_name_max_len: DEFAULT_MAX_TEXT_LEN,
        }
    }
}

fn to_strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
