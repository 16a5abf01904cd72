//! エラー型定義

use thiserror::Error;

/// 入力フォームの項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    File,
    Columns,
    ProductName,
}

impl InputField {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputField::File => "file",
            InputField::Columns => "columns",
            InputField::ProductName => "productName",
        }
    }
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 送信前の入力検証エラー
///
/// 常にひとつの項目だけを指す（優先順: ファイル → 列 → 製品名）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a file.")]
    MissingFile,

    #[error("Unsupported file type: {0}. Supported formats: .xlsx, .xls")]
    UnsupportedFile(String),

    #[error("Columns must be a comma-separated list of numbers.")]
    MalformedColumns,

    #[error("Product key cannot be empty.")]
    EmptyProductName,
}

impl ValidationError {
    /// 問題のある入力項目
    pub fn field(&self) -> InputField {
        match self {
            ValidationError::MissingFile | ValidationError::UnsupportedFile(_) => InputField::File,
            ValidationError::MalformedColumns => InputField::Columns,
            ValidationError::EmptyProductName => InputField::ProductName,
        }
    }
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response format from server: {0}")]
    MalformedResponse(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
