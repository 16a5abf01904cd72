use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dropsight")]
#[command(about = "製品データを解析サービスへ送信し成功確率と類似製品を比較", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スプレッドシートを送信して解析
    Analyze {
        /// Excelファイル (.xlsx/.xls)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// 抽出する列（例: 1,2,3）
        #[arg(short, long, default_value = "")]
        columns: String,

        /// 製品名（製品キー）
        #[arg(short, long, default_value = "")]
        product_name: String,

        /// 応答JSONの保存先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Excelレポートの出力先（ファイルまたはディレクトリ）
        #[arg(long)]
        excel: Option<PathBuf>,
    },

    /// 保存済みの応答JSONからExcelを生成
    Export {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 保存済みの応答JSONをレポート表示
    Show {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 解析サービスのルートURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// リクエスト期限（ミリ秒）を設定
        #[arg(long)]
        set_timeout_ms: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
