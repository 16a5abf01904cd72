//! 解析サービス送信クライアント
//!
//! - 検証済みリクエストをmultipartで1回だけPOSTする（再試行なし）
//! - 期限切れ・キャンセル時は送信中のリクエストを破棄して `Timeout`
//! - 失敗はすべて `DropsightError` のいずれかに分類する

use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use crate::error::{DropsightError, Result, GENERIC_FAILURE_MESSAGE};
use dropsight_common::{validate_input, AnalysisRequest, AnalysisResponse, UploadFile};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub const ANALYZE_PATH: &str = "/api/analyze";

/// クライアント設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ANALYZE_PATH)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// キャンセルを発火する側
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// 送信処理に渡すキャンセルトークン
#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    /// 発火しないトークン
    pub fn never() -> Self {
        let (_sender, receiver) = watch::channel(false);
        Self { receiver }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// 発火するまで待つ。ハンドルが破棄された場合は永久に待つ
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (sender, receiver) = watch::channel(false);
    (CancelHandle { sender }, CancelToken { receiver })
}

/// 2xx以外の応答本文
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

pub struct SubmissionClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl SubmissionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DropsightError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;
        Ok(Self { http, config })
    }

    /// フォーム入力を検証してから送信する
    ///
    /// 検証に失敗した場合は通信を一切行わない
    pub async fn analyze(
        &self,
        file: Option<UploadFile>,
        columns: &str,
        product_name: &str,
        cancel: &CancelToken,
    ) -> Result<AnalysisResponse> {
        let request = validate_input(file, columns, product_name)?;
        self.submit_with_cancel(&request, cancel).await
    }

    pub async fn submit(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        self.submit_with_cancel(request, &CancelToken::never()).await
    }

    /// 期限とキャンセル付きで送信
    pub async fn submit_with_cancel(
        &self,
        request: &AnalysisRequest,
        cancel: &CancelToken,
    ) -> Result<AnalysisResponse> {
        if cancel.is_cancelled() {
            warn!("送信前にキャンセル済み");
            return Err(DropsightError::Timeout);
        }

        let endpoint = self.config.endpoint();
        let started = Instant::now();
        info!(
            endpoint = %endpoint,
            product = %request.product_name,
            columns = %request.columns.as_str(),
            bytes = request.file.bytes.len(),
            "解析リクエスト送信"
        );

        // 期限・キャンセル側が勝つと送信中のFutureは破棄され通信も中断される
        let outcome = tokio::select! {
            outcome = self.send(&endpoint, request) => outcome,
            _ = tokio::time::sleep(self.config.timeout()) => {
                warn!(timeout_ms = self.config.timeout_ms, "解析リクエストがタイムアウト");
                Err(DropsightError::Timeout)
            }
            _ = cancel.cancelled() => {
                warn!("解析リクエストをキャンセル");
                Err(DropsightError::Timeout)
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(response) => info!(
                elapsed_ms,
                similar = response.result.similar_products.len(),
                "解析完了"
            ),
            Err(DropsightError::Unknown { cause }) => {
                error!(elapsed_ms, cause = %cause, "解析失敗（分類不能）")
            }
            Err(DropsightError::MalformedResponse(detail)) => {
                warn!(elapsed_ms, detail = %detail, "応答形式が不正")
            }
            Err(e) => warn!(elapsed_ms, error = ?e, "解析失敗"),
        }

        outcome
    }

    async fn send(&self, endpoint: &str, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        let form = build_form(request)?;

        let response = self
            .http
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "応答受信");

        if !status.is_success() {
            // 本文が読めなくても状態コードで分類する
            let body = response.bytes().await.unwrap_or_default();
            return Err(DropsightError::Transport {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.bytes().await.map_err(classify_transport_error)?;

        let text = std::str::from_utf8(&body).map_err(DropsightError::unknown)?;
        Ok(AnalysisResponse::from_json(text)?)
    }
}

/// multipartフォームを組み立てる（file / columns / productName）
pub fn build_form(request: &AnalysisRequest) -> Result<Form> {
    let file = Part::bytes(request.file.bytes.clone())
        .file_name(request.file.file_name.clone())
        .mime_str(request.file.mime_type())
        .map_err(DropsightError::unknown)?;

    Ok(Form::new()
        .part("file", file)
        .text("columns", request.columns.as_str().to_string())
        .text("productName", request.product_name.clone()))
}

/// ローカルファイルを送信用に読み込む
pub fn read_upload(path: &Path) -> Result<UploadFile> {
    if !path.is_file() {
        return Err(DropsightError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile::new(file_name, bytes))
}

/// エラー応答から表示メッセージを取り出す
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

fn classify_transport_error(err: reqwest::Error) -> DropsightError {
    if err.is_timeout() {
        DropsightError::Timeout
    } else {
        DropsightError::unknown(err)
    }
}
