//! 比較表示用データの生成
//!
//! 主製品を先頭に、類似製品をサーバーの返した順で並べる。
//! 確率や類似度で並べ替えることはしない。

use crate::types::{AnalysisResult, Product};
use serde::{Deserialize, Serialize};

/// 主製品の表示ラベル
pub const PRIMARY_LABEL: &str = "My Product";

/// 主製品の色
pub const PRIMARY_COLOR: &str = "#ef4444";

/// 類似製品の色（位置で循環）
pub const COMPARISON_PALETTE: [&str; 3] = ["#3b82f6", "#10b981", "#f59e0b"];

/// 表示色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorToken {
    Primary,
    /// `COMPARISON_PALETTE` のスロット番号
    Comparison(usize),
}

impl ColorToken {
    /// 類似製品の位置からスロットを決める
    pub fn for_position(index: usize) -> Self {
        ColorToken::Comparison(index % COMPARISON_PALETTE.len())
    }

    pub fn hex(&self) -> &'static str {
        match self {
            ColorToken::Primary => PRIMARY_COLOR,
            ColorToken::Comparison(slot) => COMPARISON_PALETTE[slot % COMPARISON_PALETTE.len()],
        }
    }

    /// `0xRRGGBB`
    pub fn rgb(&self) -> u32 {
        u32::from_str_radix(self.hex().trim_start_matches('#'), 16).unwrap_or(0)
    }
}

impl std::fmt::Display for ColorToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorToken::Primary => write!(f, "primary"),
            ColorToken::Comparison(slot) => write!(f, "comparison-{}", slot + 1),
        }
    }
}

/// 比較グラフ・表の1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub label: String,
    pub display_name: String,
    pub probability_percent: f64,
    pub color: ColorToken,
}

/// 位置から英字を割り当てる（A..Z, AA, AB, ...）
pub fn position_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// 類似製品の表示ラベル
pub fn comparison_label(index: usize) -> String {
    format!("Product {}", position_letters(index))
}

/// 解析結果から比較行を生成
///
/// 常に `1 + similar_products.len()` 行を返す。入力は変更しない。
pub fn normalize(result: &AnalysisResult, selected: &Product) -> Vec<ComparisonRow> {
    let primary = ComparisonRow {
        label: PRIMARY_LABEL.to_string(),
        display_name: selected.key.clone(),
        probability_percent: result.probability * 100.0,
        color: ColorToken::Primary,
    };

    std::iter::once(primary)
        .chain(
            result
                .similar_products
                .iter()
                .enumerate()
                .map(|(index, product)| ComparisonRow {
                    label: comparison_label(index),
                    display_name: product.key.clone(),
                    probability_percent: product.probability.unwrap_or(0.0) * 100.0,
                    color: ColorToken::for_position(index),
                }),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(key: &str, probability: Option<f64>) -> Product {
        Product {
            key: key.to_string(),
            reviews: 10,
            price: 99.0,
            sales: 5,
            probability,
            similarity: Some(0.5),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_position_letters() {
        assert_eq!(position_letters(0), "A");
        assert_eq!(position_letters(1), "B");
        assert_eq!(position_letters(25), "Z");
        assert_eq!(position_letters(26), "AA");
        assert_eq!(position_letters(27), "AB");
        assert_eq!(position_letters(701), "ZZ");
        assert_eq!(position_letters(702), "AAA");
    }

    #[test]
    fn test_normalize_preserves_order() {
        let result = AnalysisResult {
            probability: 0.65,
            similar_products: vec![
                product("P1", Some(0.9)),
                product("P2", Some(0.7)),
                product("P3", Some(0.5)),
            ],
        };
        let selected = product("Widget", None);

        let rows = normalize(&result, &selected);

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["My Product", "Product A", "Product B", "Product C"]);

        let names: Vec<&str> = rows.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, ["Widget", "P1", "P2", "P3"]);

        let expected = [65.0, 90.0, 70.0, 50.0];
        for (row, want) in rows.iter().zip(expected) {
            assert!(approx(row.probability_percent, want), "{} != {}", row.probability_percent, want);
        }
    }

    #[test]
    fn test_normalize_does_not_sort_by_value() {
        let result = AnalysisResult {
            probability: 0.1,
            similar_products: vec![product("Low", Some(0.2)), product("High", Some(0.95))],
        };
        let rows = normalize(&result, &product("Widget", None));
        assert_eq!(rows[1].display_name, "Low");
        assert_eq!(rows[2].display_name, "High");
    }

    #[test]
    fn test_normalize_missing_probability_is_zero() {
        let result = AnalysisResult {
            probability: 0.5,
            similar_products: vec![product("NoScore", None)],
        };
        let rows = normalize(&result, &product("Widget", None));
        assert_eq!(rows[1].probability_percent, 0.0);
    }

    #[test]
    fn test_normalize_row_count() {
        for n in [0usize, 1, 3, 4, 30] {
            let result = AnalysisResult {
                probability: 0.5,
                similar_products: (0..n)
                    .map(|i| product(&format!("P{}", i), Some(0.5)))
                    .collect(),
            };
            assert_eq!(normalize(&result, &product("Widget", None)).len(), 1 + n);
        }
    }

    #[test]
    fn test_normalize_colors_wrap_around() {
        let result = AnalysisResult {
            probability: 0.5,
            similar_products: (0..5).map(|i| product(&format!("P{}", i), None)).collect(),
        };
        let rows = normalize(&result, &product("Widget", None));
        let colors: Vec<&str> = rows.iter().map(|r| r.color.hex()).collect();
        assert_eq!(
            colors,
            ["#ef4444", "#3b82f6", "#10b981", "#f59e0b", "#3b82f6", "#10b981"]
        );
    }

    #[test]
    fn test_normalize_ignores_primary_similarity() {
        let mut selected = product("Widget", Some(0.99));
        selected.similarity = Some(0.3);
        let result = AnalysisResult {
            probability: 0.25,
            similar_products: vec![],
        };
        let rows = normalize(&result, &selected);
        assert_eq!(rows.len(), 1);
        assert!(approx(rows[0].probability_percent, 25.0));
        assert_eq!(rows[0].color, ColorToken::Primary);
    }

    #[test]
    fn test_normalize_leaves_inputs_untouched() {
        let result = AnalysisResult {
            probability: 0.4,
            similar_products: vec![product("P1", Some(0.9))],
        };
        let selected = product("Widget", None);
        let before = (result.clone(), selected.clone());
        let _ = normalize(&result, &selected);
        assert_eq!((result, selected), before);
    }

    #[test]
    fn test_color_token_rgb_and_display() {
        assert_eq!(ColorToken::Primary.rgb(), 0xef4444);
        assert_eq!(ColorToken::Comparison(2).rgb(), 0xf59e0b);
        assert_eq!(ColorToken::Primary.to_string(), "primary");
        assert_eq!(ColorToken::for_position(3).to_string(), "comparison-1");
    }
}
