pub mod excel;

use crate::error::Result;
use dropsight_common::AnalysisResponse;
use std::path::{Path, PathBuf};

/// 既定のファイル名（作成日時入り）
pub fn default_file_name() -> String {
    format!("dropsight-{}.xlsx", chrono::Local::now().format("%Y%m%d-%H%M%S"))
}

/// 出力先を決める。ディレクトリ指定なら既定のファイル名を付ける
pub fn output_path_for(output: Option<&Path>) -> PathBuf {
    match output {
        None => PathBuf::from(default_file_name()),
        Some(path) if path.is_dir() || path.extension().is_none() => {
            path.join(default_file_name())
        }
        Some(path) => path.to_path_buf(),
    }
}

pub fn export_results(response: &AnalysisResponse, output: Option<&Path>) -> Result<PathBuf> {
    let output_path = output_path_for(output);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!(path = %output_path.display(), "Excelを生成中");
    excel::generate_excel(response, &output_path)?;
    Ok(output_path)
}
