use clap::Parser;
use dropsight::{cli, client, config, error, export, logging, report};
use cli::{Cli, Commands};
use client::{cancel_pair, read_upload, SubmissionClient};
use config::Config;
use dropsight_common::{validate_input, AnalysisResponse};
use error::Result;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command).await {
        tracing::error!(error = ?e, "コマンド失敗");
        eprintln!("✖ {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze { file, columns, product_name, output, excel } => {
            analyze(file, &columns, &product_name, output, excel).await?;
        }

        Commands::Export { input, output } => {
            let response = load_response(&input)?;
            let path = export::export_results(&response, output.as_deref())?;
            println!("✔ Excel出力: {}", path.display());
        }

        Commands::Show { input } => {
            let response = load_response(&input)?;
            print!("{}", report::render(&response));
        }

        Commands::Config { set_base_url, set_timeout_ms, show } => {
            let config_path = Config::config_path()?;
            let mut config = Config::load_from(&config_path)?;

            if set_base_url.is_some() || set_timeout_ms.is_some() {
                if let Some(url) = set_base_url {
                    config.base_url = url;
                }
                if let Some(ms) = set_timeout_ms {
                    config.timeout_ms = ms;
                }
                config.save_to(&config_path)?;
                println!("✔ 設定を保存しました: {}", config_path.display());
            }

            if show {
                let effective = Config::load()?;
                println!("設定:");
                println!("  ファイル: {}", config_path.display());
                println!("  baseUrl: {}", effective.base_url);
                println!("  timeoutMs: {}", effective.timeout_ms);
                println!("  エンドポイント: {}", effective.client_config().endpoint());
            }
        }
    }

    Ok(())
}

async fn analyze(
    file: Option<PathBuf>,
    columns: &str,
    product_name: &str,
    output: Option<PathBuf>,
    excel: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;

    let upload = file.as_deref().map(read_upload).transpose()?;
    // 検証に通らなければ送信しない
    let request = validate_input(upload, columns, product_name)?;

    let client = SubmissionClient::new(config.client_config())?;
    let (handle, token) = cancel_pair();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Analyzing {}...", request.product_name));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = client.submit_with_cancel(&request, &token).await;

    spinner.finish_and_clear();
    ctrl_c.abort();

    let response = outcome?;
    print!("{}", report::render(&response));

    if let Some(path) = output {
        save_response(&response, &path)?;
        println!("\n✔ 応答を保存: {}", path.display());
    }

    if let Some(target) = excel {
        let path = export::export_results(&response, Some(&target))?;
        println!("✔ Excel出力: {}", path.display());
    }

    Ok(())
}

fn load_response(input: &Path) -> Result<AnalysisResponse> {
    if !input.is_file() {
        return Err(error::DropsightError::FileNotFound(input.display().to_string()));
    }
    let content = std::fs::read_to_string(input)?;
    AnalysisResponse::from_json(&content).map_err(|e| match e {
        dropsight_common::Error::Json(json) => error::DropsightError::JsonParse(json),
        other => other.into(),
    })
}

fn save_response(response: &AnalysisResponse, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(response)?;
    std::fs::write(path, json)?;
    Ok(())
}
