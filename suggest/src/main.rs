//! 補完候補を表示するユーティリティ
//!
//! このバイナリは、標準入力から1行ずつクエリを読み込み、
//! 指定された出力形式(plain、detail、check)で補完候補を出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::str::FromStr;

use ranktrie::utils::normalize_word;
use ranktrie::{Dictionary, Engine, SearchConfig, Suggester};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Plain,
    Detail,
    Check,
}

/// `OutputMode` の `FromStr` 実装
impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "plain" => Ok(Self::Plain),
            "detail" => Ok(Self::Detail),
            "check" => Ok(Self::Check),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "suggest", about = "Suggests completions and corrections")]
struct Args {
    /// Compiled trie (zstd-compressed when the path ends with `.zst`).
    #[clap(short = 'i', long)]
    trie: PathBuf,

    /// Output mode. Choices are plain, detail, and check.
    #[clap(short = 'O', long, default_value = "plain")]
    output_mode: OutputMode,

    /// Maximum number of suggestions per query.
    #[clap(short = 'n', long, default_value_t = ranktrie::config::DEFAULT_LIMIT)]
    limit: usize,

    /// Maximum edit distance of corrections.
    #[clap(short = 'd', long, default_value_t = ranktrie::config::DEFAULT_MAX_DISTANCE)]
    max_distance: u32,
}

/// メイン関数
///
/// トライを読み込み、標準入力から読み込んだクエリの補完候補を標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    eprintln!("Loading the trie...");
    let dict = if args.trie.extension().is_some_and(|ext| ext == "zst") {
        Dictionary::from_zstd(&args.trie)?
    } else {
        Dictionary::from_path(&args.trie)?
    };
    let config = SearchConfig::new()
        .max_distance(args.max_distance)
        .default_limit(args.limit);
    let suggester = Suggester::new(dict).with_config(config);
    let mut engine = Engine::from_suggester(suggester.clone());

    eprintln!("Ready to suggest");

    let is_tty = std::io::stdout().is_terminal();

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        match args.output_mode {
            OutputMode::Plain => {
                let suggestions = engine.suggest_default(&line);
                let approximate = suggestions.approximate.wait()?;
                for (i, word) in suggestions.exact.iter().chain(&approximate).enumerate() {
                    if i != 0 {
                        out.write_all(b" ")?;
                    }
                    out.write_all(word.as_bytes())?;
                }
                out.write_all(b"\n")?;
            }
            OutputMode::Detail => {
                let query = normalize_word(&line);
                let exact = suggester.prefix_search(&query, args.limit);
                for m in &exact {
                    writeln!(&mut out, "{}\tprefix\trank={}", m.word, m.rank)?;
                }
                let remaining = args.limit - exact.len().min(args.limit);
                if remaining != 0 {
                    let exclude: Vec<String> = exact.into_iter().map(|m| m.word).collect();
                    let fuzzy = suggester.fuzzy_search_with_cancel(
                        &query,
                        remaining,
                        args.max_distance,
                        &exclude,
                        &ranktrie::CancelToken::never(),
                    )?;
                    for m in fuzzy {
                        writeln!(
                            &mut out,
                            "{}\tfuzzy\trank={}\tdistance={}",
                            m.word, m.rank, m.distance
                        )?;
                    }
                }
                out.write_all(b"EOS\n")?;
            }
            OutputMode::Check => {
                let known = engine.is_word(&line);
                writeln!(&mut out, "{}\t{}", line, if known { "known" } else { "unknown" })?;
            }
        }
        if is_tty {
            out.flush()?;
        }
    }

    Ok(())
}
