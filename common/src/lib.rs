//! DropSight Common Library
//!
//! CLIと他のフロントエンドで共有される型とロジック（I/Oなし）

pub mod comparison;
pub mod error;
pub mod request;
pub mod types;

pub use comparison::{normalize, ColorToken, ComparisonRow};
pub use error::{Error, InputField, Result, ValidationError};
pub use request::{validate_input, AnalysisRequest, Columns, UploadFile};
pub use types::{AnalysisResponse, AnalysisResult, Product};
