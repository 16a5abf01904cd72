//! DropSight
//!
//! 製品データのスプレッドシートを解析サービスへ送信し、
//! 成功確率と類似製品の比較データを得る

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod report;

pub use client::{cancel_pair, CancelHandle, CancelToken, ClientConfig, SubmissionClient};
pub use error::{DropsightError, Result};
