use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ログ出力を初期化する（stderr、`RUST_LOG` 優先）
///
/// 標準出力はレポート用に空けておく
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // テストなどで二重初期化された場合は既存のものを使う
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "dropsight=debug,dropsight_common=debug"
    } else {
        "dropsight=info"
    }
}
