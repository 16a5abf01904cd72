//! 解析リクエストの入力検証
//!
//! 送信前に同期的に検証し、問題があれば最初のひとつだけを返す。
//! 優先順位: ファイル → 列指定 → 製品名

use crate::error::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // \d はUnicode数字にもマッチするためASCIIに限定
    static ref COLUMNS_PATTERN: Regex = Regex::new(r"^([0-9]+,)*[0-9]+$").unwrap();
}

/// 受け付けるスプレッドシートの拡張子
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// アップロードするファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// 小文字化した拡張子
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn is_spreadsheet(&self) -> bool {
        self.extension()
            .is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
    }

    /// multipart送信時のContent-Type
    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Some("xls") => "application/vnd.ms-excel",
            _ => "application/octet-stream",
        }
    }
}

/// 抽出対象の列指定
///
/// 送信時は入力された文字列をそのまま使う
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    raw: String,
}

impl Columns {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if !COLUMNS_PATTERN.is_match(raw) {
            return Err(ValidationError::MalformedColumns);
        }

        Ok(Self {
            raw: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// 検証済みの解析リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub file: UploadFile,
    pub columns: Columns,
    pub product_name: String,
}

/// フォーム入力を検証して `AnalysisRequest` を組み立てる
///
/// 副作用なし。同じ入力には常に同じ結果を返す。
///
/// # Arguments
/// * `file` - 選択されたファイル（未選択なら `None`）
/// * `columns` - 列指定の生文字列（例: "1,2,3"）
/// * `product_name` - 製品名の生文字列
pub fn validate_input(
    file: Option<UploadFile>,
    columns: &str,
    product_name: &str,
) -> Result<AnalysisRequest, ValidationError> {
    let file = file.ok_or(ValidationError::MissingFile)?;
    if !file.is_spreadsheet() {
        return Err(ValidationError::UnsupportedFile(file.file_name));
    }

    let columns = Columns::parse(columns)?;

    let product_name = product_name.trim();
    if product_name.is_empty() {
        return Err(ValidationError::EmptyProductName);
    }

    Ok(AnalysisRequest {
        file,
        columns,
        product_name: product_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputField;

    fn sheet() -> Option<UploadFile> {
        Some(UploadFile::new("products.xlsx", vec![0x50, 0x4b, 0x03, 0x04]))
    }

    #[test]
    fn test_valid_columns() {
        for raw in ["1", "0", "1,2,3", "10,200,3000", "007,8"] {
            let columns = Columns::parse(raw).unwrap_or_else(|_| panic!("{} は有効", raw));
            assert_eq!(columns.as_str(), raw);
        }
    }

    #[test]
    fn test_malformed_columns() {
        for raw in ["", ",", "1,", ",1", "1,,2", "a", "1, 2", " 1", "1;2", "-1", "1.5", "١"] {
            assert_eq!(
                Columns::parse(raw),
                Err(ValidationError::MalformedColumns),
                "{:?} は不正",
                raw
            );
        }
    }

    #[test]
    fn test_large_column_index_accepted() {
        let request = validate_input(sheet(), "1,4294967296", "Widget").unwrap();
        assert_eq!(request.columns.as_str(), "1,4294967296");

        let huge = "9".repeat(40);
        assert!(Columns::parse(&huge).is_ok());
    }

    #[test]
    fn test_validate_success() {
        let request = validate_input(sheet(), "1,2,3", "Widget").unwrap();
        assert_eq!(request.file.file_name, "products.xlsx");
        assert_eq!(request.columns.as_str(), "1,2,3");
        assert_eq!(request.product_name, "Widget");
    }

    #[test]
    fn test_validate_trims_product_name() {
        let request = validate_input(sheet(), "1", "  Widget \t").unwrap();
        assert_eq!(request.product_name, "Widget");
    }

    #[test]
    fn test_missing_file_wins() {
        let err = validate_input(None, "1,2,3", "Widget").unwrap_err();
        assert_eq!(err, ValidationError::MissingFile);

        // 他の項目も不正でもファイルが優先
        let err = validate_input(None, "1,,2", "").unwrap_err();
        assert_eq!(err.field(), InputField::File);
    }

    #[test]
    fn test_unsupported_file() {
        let file = Some(UploadFile::new("notes.txt", b"hello".to_vec()));
        let err = validate_input(file, "1", "Widget").unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedFile("notes.txt".to_string()));
        assert_eq!(err.field(), InputField::File);
    }

    #[test]
    fn test_spreadsheet_extension_case_insensitive() {
        let file = Some(UploadFile::new("DATA.XLS", vec![]));
        assert!(validate_input(file, "1", "Widget").is_ok());
    }

    #[test]
    fn test_malformed_columns_scenario() {
        let err = validate_input(sheet(), "1,,2", "Widget").unwrap_err();
        assert_eq!(err, ValidationError::MalformedColumns);
    }

    #[test]
    fn test_columns_error_beats_empty_name() {
        let err = validate_input(sheet(), "1,", "   ").unwrap_err();
        assert_eq!(err.field(), InputField::Columns);
    }

    #[test]
    fn test_empty_product_name() {
        let err = validate_input(sheet(), "1,2", " ").unwrap_err();
        assert_eq!(err, ValidationError::EmptyProductName);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let first = validate_input(sheet(), "4,5", "Widget");
        let second = validate_input(sheet(), "4,5", "Widget");
        assert_eq!(first, second);

        let first = validate_input(sheet(), "4,,5", "Widget");
        let second = validate_input(sheet(), "4,,5", "Widget");
        assert_eq!(first, second);
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(
            UploadFile::new("a.xlsx", vec![]).mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(UploadFile::new("a.xls", vec![]).mime_type(), "application/vnd.ms-excel");
        assert_eq!(UploadFile::new("a", vec![]).mime_type(), "application/octet-stream");
    }
}
