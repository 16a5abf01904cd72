//! 解析データの型定義
//!
//! 解析サービスとの送受信で使う型:
//! - Product: 製品1件（主製品・類似製品の両方）
//! - AnalysisResult: 成功確率と類似製品リスト
//! - AnalysisResponse: サービスの応答（`result` + `product`）

use crate::comparison::{normalize, ComparisonRow};
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::HashSet;

/// 成功応答に必須のトップレベルキー
pub const REQUIRED_RESPONSE_KEYS: [&str; 2] = ["result", "product"];

/// 製品
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub key: String,

    #[serde(deserialize_with = "deserialize_count")]
    pub reviews: u64,

    pub price: f64,

    #[serde(deserialize_with = "deserialize_count")]
    pub sales: u64,

    /// 成功確率（類似製品のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,

    /// 主製品との類似度（類似製品のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

/// 件数を読む。`120.0` のような整数値の浮動小数も受け付ける
fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(n) = number.as_u64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative integer count, got {}",
            number
        ))),
    }
}

/// 解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub probability: f64,

    /// 並び順はサーバーの返した順のまま保持する
    #[serde(default)]
    pub similar_products: Vec<Product>,
}

/// 解析サービスの成功応答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub result: AnalysisResult,
    pub product: Product,
}

impl AnalysisResponse {
    /// 応答本文をパースして形式を検証する
    ///
    /// # Returns
    /// * `Ok(AnalysisResponse)` - `result` と `product` が揃い値域も妥当
    /// * `Err(Error::Json)` - JSONとして読めない
    /// * `Err(Error::MalformedResponse)` - キー欠落・型不一致・値域外
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        {
            let object = value.as_object().ok_or_else(|| {
                Error::MalformedResponse("response body is not a JSON object".into())
            })?;
            for key in REQUIRED_RESPONSE_KEYS {
                if object.get(key).map_or(true, Value::is_null) {
                    return Err(Error::MalformedResponse(format!("missing key `{}`", key)));
                }
            }
        }

        let response: AnalysisResponse = serde_json::from_value(value)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        response.verify()?;
        Ok(response)
    }

    /// 値域と一意性の検証
    pub fn verify(&self) -> Result<()> {
        check_unit("result.probability", self.result.probability)?;
        check_product("product", &self.product)?;

        let mut seen = HashSet::new();
        for (index, similar) in self.result.similar_products.iter().enumerate() {
            let path = format!("result.similarProducts[{}]", index);
            check_product(&path, similar)?;
            if let Some(p) = similar.probability {
                check_unit(&format!("{}.probability", path), p)?;
            }
            if let Some(s) = similar.similarity {
                check_unit(&format!("{}.similarity", path), s)?;
            }
            if !seen.insert(similar.key.as_str()) {
                return Err(Error::MalformedResponse(format!(
                    "duplicate product key `{}` in similarProducts",
                    similar.key
                )));
            }
        }

        Ok(())
    }

    /// 比較表示用の行を生成
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        normalize(&self.result, &self.product)
    }
}

fn check_product(path: &str, product: &Product) -> Result<()> {
    if product.key.is_empty() {
        return Err(Error::MalformedResponse(format!("{}.key is empty", path)));
    }
    if !(product.price.is_finite() && product.price >= 0.0) {
        return Err(Error::MalformedResponse(format!(
            "{}.price out of range: {}",
            path, product.price
        )));
    }
    Ok(())
}

fn check_unit(path: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::MalformedResponse(format!(
            "{} out of range [0, 1]: {}",
            path, value
        )))
    }
}
