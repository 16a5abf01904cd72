use dropsight_common::ValidationError;
use thiserror::Error;

/// 解析失敗時の汎用メッセージ
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed";

#[derive(Error, Debug)]
pub enum DropsightError {
    /// 送信前の入力検証エラー（サーバーには届かない）
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Request timed out. Please try again later.")]
    Timeout,

    /// 2xx以外のHTTPステータス
    #[error("{message}")]
    Transport { status: u16, message: String },

    #[error("Invalid response format from server")]
    MalformedResponse(String),

    /// 分類できない失敗。原因は `cause` に保持し表示はしない
    #[error("An unknown error occurred. Please try again.")]
    Unknown { cause: String },

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),
}

impl DropsightError {
    pub fn unknown(cause: impl std::fmt::Display) -> Self {
        DropsightError::Unknown {
            cause: cause.to_string(),
        }
    }

    /// 利用者に表示する1行メッセージ
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// 送信段階（ネットワーク以降）のエラーか
    pub fn is_submission_error(&self) -> bool {
        matches!(
            self,
            DropsightError::Timeout
                | DropsightError::Transport { .. }
                | DropsightError::MalformedResponse(_)
                | DropsightError::Unknown { .. }
        )
    }
}

impl From<dropsight_common::Error> for DropsightError {
    fn from(err: dropsight_common::Error) -> Self {
        match err {
            dropsight_common::Error::Validation(e) => DropsightError::Validation(e),
            dropsight_common::Error::MalformedResponse(detail) => {
                DropsightError::MalformedResponse(detail)
            }
            dropsight_common::Error::Json(e) => DropsightError::unknown(e),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for DropsightError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        DropsightError::ExcelGeneration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DropsightError>;
