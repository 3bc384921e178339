//! ranktrie 辞書コンパイラのメインエントリーポイント
//!
//! このモジュールは、単語リストから補完用のトライを構築し、
//! 構築済みのトライを検証するためのサブコマンドを提供します。

mod build;
mod verify;

use clap::Parser;
use thiserror::Error;

use crate::{build::BuildError, verify::VerifyError};

/// コマンドライン引数の構造体
///
/// `clap`を使用してコマンドライン引数をパースします。
#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// 単語リストからバイナリのトライを構築します
    ///
    /// 頻度順に並んだ単語リスト(1行1単語)を読み込み、トライファイルを出力します。
    Build(build::Args),

    /// 構築済みのトライを読み込んで検証します
    ///
    /// 統計情報を表示し、単語リストが指定されていれば往復の一致を確認します。
    Verify(verify::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
///
/// 各サブコマンドで発生したエラーをラップします。
#[derive(Debug, Error)]
pub enum CompileError {
    /// トライ構築中のエラー
    #[error(transparent)]
    BuildError(#[from] BuildError),
    /// トライ検証中のエラー
    #[error(transparent)]
    VerifyError(#[from] VerifyError),
}

/// メイン関数
///
/// コマンドライン引数をパースし、指定されたサブコマンドを実行します。
///
/// # エラー
///
/// 各サブコマンドの実行中にエラーが発生した場合、そのエラーが返されます。
fn main() -> Result<(), CompileError> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Verify(args) => Ok(verify::run(args)?),
    }
}
