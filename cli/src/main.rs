use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use care_core::{ContextExpander, HierarchySeparator, RouteTemplate, ShortcutConfig};
use care_keymap::{KeyChord, Keymap};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "care-cli",
    about = "Tiện ích dòng lệnh cho phạm vi phím tắt và đường dẫn API."
)]
struct Args {
    /// In kết quả dạng JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Bật log debug (ghi đè bởi RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mở rộng chuỗi ngữ cảnh thành danh sách phạm vi.
    Expand {
        context: String,
        /// Ký tự phân cấp.
        #[arg(short, long, default_value = ":")]
        separator: String,
    },
    /// Tra hành động gắn với một tổ hợp phím.
    Resolve {
        /// Đường dẫn tới file keymap JSON.
        #[arg(short, long)]
        keymap: PathBuf,
        #[arg(short, long, default_value = "")]
        context: String,
        /// Tổ hợp phím, ví dụ `ctrl+p`.
        chord: String,
        #[arg(short, long, default_value = ":")]
        separator: String,
    },
    /// Liệt kê phím tắt có hiệu lực trong một ngữ cảnh.
    Bindings {
        #[arg(short, long)]
        keymap: PathBuf,
        #[arg(short, long, default_value = "")]
        context: String,
        #[arg(short, long, default_value = ":")]
        separator: String,
    },
    /// Dựng đường dẫn từ template.
    Route {
        template: String,
        /// Tham số dạng `name=value`.
        #[arg(short, long = "param", value_parser = parse_pair)]
        params: Vec<(String, String)>,
        /// Query dạng `key=value`, giữ nguyên thứ tự.
        #[arg(short, long = "query", value_parser = parse_pair)]
        query: Vec<(String, String)>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Expand { context, separator } => {
            let separator = HierarchySeparator::new(&separator)?;
            let expanded = ContextExpander::new(separator).expand(&context);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&expanded)?);
            } else {
                for scope in expanded {
                    println!("{scope}");
                }
            }
        }
        Command::Resolve {
            keymap,
            context,
            chord,
            separator,
        } => {
            let keymap = load_keymap(&keymap, separator)?;
            let chord = KeyChord::parse(&chord)?;
            let resolution = keymap.resolve(&context, &chord);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                match resolution {
                    Some(hit) => println!("{} ({})", hit.action, hit.scope),
                    None => println!("Không có phím tắt cho {chord}"),
                }
            }
        }
        Command::Bindings {
            keymap,
            context,
            separator,
        } => {
            let keymap = load_keymap(&keymap, separator)?;
            let active = keymap.active_bindings(&context);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&active)?);
            } else {
                for binding in active {
                    println!("{:<16} {:<32} {}", binding.keys, binding.action, binding.scope);
                }
            }
        }
        Command::Route {
            template,
            params,
            query,
        } => {
            let route = RouteTemplate::parse(&template)?;
            let params: BTreeMap<String, String> = params.into_iter().collect();
            let rendered = route.render_with_query(&params, &query)?;
            if args.json {
                println!("{}", serde_json::to_string(&rendered)?);
            } else {
                println!("{rendered}");
            }
        }
    }

    Ok(())
}

fn load_keymap(path: &Path, separator: String) -> anyhow::Result<Keymap> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được file {:?}", path))?;
    let config = ShortcutConfig {
        hierarchy_separator: separator,
        ..ShortcutConfig::default()
    };
    let keymap = Keymap::from_json_str(&data, &config)
        .with_context(|| format!("Keymap không hợp lệ: {:?}", path))?;
    debug!(path = %path.display(), bindings = keymap.len(), "keymap ready");
    Ok(keymap)
}

fn parse_pair(raw: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("cần dạng name=value, nhận {raw:?}"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
