use std::{
    error::Error,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::{Parser, Subcommand, ValueEnum};
use ime_core::{
    DictionaryStore, Engine, PartitionKey, PartitionStatus,
    key_event::{Action, InputEvent},
    session::Session,
    settings::{DictLayout, Settings, parse_settings_toml},
};
use ime_dict::{CompiledDict, DictSource};
use ime_pinyin::LongestMatchSegmenter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type CliEngine = Engine<Arc<DictionaryStore<DictSource>>, LongestMatchSegmenter>;

/// 每页展示的候选数（对应数字键 1-9）。
const PAGE_SIZE: usize = 9;

#[derive(Parser)]
#[command(name = "ime_cli", about = "拼音输入法候选引擎 demo")]
struct Cli {
    /// TOML 配置文件（缺省使用内置默认值）
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// 词典路径（覆盖配置中的 dictionary.path）
    #[arg(long, global = true)]
    dict: Option<PathBuf>,
    /// 词典布局（覆盖配置中的 dictionary.layout）
    #[arg(long, global = true, value_enum)]
    layout: Option<LayoutArg>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// 交互模式：按行输入拼音，再用数字选词
    Repl,
    /// 一次性输出候选
    Resolve {
        /// 拼音串（只含 a-z）
        inputs: Vec<String>,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 把 rime 风格词表编译成分区 JSON 词典
    Build {
        /// 词表文件，按优先级排列（先出现的条目优先）
        files: Vec<PathBuf>,
        /// 输出路径：per-letter 时为目录，combined 时为文件
        #[arg(long)]
        out: PathBuf,
        /// 输出布局
        #[arg(long, value_enum, default_value = "combined")]
        format: OutputFormat,
    },
    /// 预加载全部分区并报告状态
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    PerLetter,
    Combined,
    Tsv,
}

impl From<LayoutArg> for DictLayout {
    fn from(v: LayoutArg) -> Self {
        match v {
            LayoutArg::PerLetter => DictLayout::PerLetter,
            LayoutArg::Combined => DictLayout::Combined,
            LayoutArg::Tsv => DictLayout::Tsv,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    PerLetter,
    Combined,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let settings = load_settings(&cli)?;
    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            let (store, engine) = open_engine(&settings)?;
            let mut session = Session::new(engine);
            repl(&mut session, &store, &settings)
        }
        Command::Resolve { inputs, json } => {
            let (_store, engine) = open_engine(&settings)?;
            resolve(&engine, &inputs, json)
        }
        Command::Build { files, out, format } => build(&files, &out, format),
        Command::Status => {
            let (store, _engine) = open_engine(&settings)?;
            status(&store)
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn Error>> {
    let mut settings = match &cli.config {
        Some(path) => parse_settings_toml(&fs::read_to_string(path)?)?,
        None => Settings::default_settings()?,
    };
    if let Some(dict) = &cli.dict {
        settings.dictionary.path = dict.clone();
    }
    if let Some(layout) = cli.layout {
        settings.dictionary.layout = layout.into();
    }
    Ok(settings)
}

fn open_engine(settings: &Settings) -> Result<(Arc<DictionaryStore<DictSource>>, CliEngine), Box<dyn Error>> {
    let source = DictSource::from_settings(&settings.dictionary)?.with_progress(|p| {
        if let Some(percent) = p.percent() {
            tracing::trace!(percent, "loading dictionary");
        }
    });
    let store = Arc::new(DictionaryStore::new(source));
    if settings.dictionary.prewarm {
        // 后台预加载，不阻塞输入
        store.prewarm()?;
    }
    let engine = Engine::new(Arc::clone(&store), LongestMatchSegmenter::from_settings(settings)).with_settings(settings);
    info!(path = %settings.dictionary.path.display(), layout = ?settings.dictionary.layout, "词典已打开");
    Ok((store, engine))
}

fn resolve(engine: &CliEngine, inputs: &[String], json: bool) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout();
    for input in inputs {
        let candidates = engine.resolve(input)?;
        if json {
            writeln!(out, "{}", serde_json::to_string(&candidates)?)?;
        } else {
            let words: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
            writeln!(out, "{input}\t{}", words.join(" "))?;
        }
    }
    Ok(())
}

fn build(files: &[PathBuf], out: &Path, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    if files.is_empty() {
        return Err("至少需要一个词表文件".into());
    }
    let dict = CompiledDict::from_paths(files)?;
    match format {
        OutputFormat::PerLetter => dict.write_per_letter(out)?,
        OutputFormat::Combined => dict.write_combined(out)?,
    }
    let stats = dict.stats();
    println!(
        "added: {}  duplicates: {}  malformed: {}  -> {}",
        stats.added,
        stats.duplicates,
        stats.malformed,
        out.display()
    );
    Ok(())
}

fn status(store: &DictionaryStore<DictSource>) -> Result<(), Box<dyn Error>> {
    store.load_all();
    let mut out = io::stdout();
    for key in PartitionKey::all() {
        let label = match store.status(key) {
            PartitionStatus::NotRequested => "-",
            PartitionStatus::Loading => "loading",
            PartitionStatus::Loaded => "ok",
            PartitionStatus::Failed => "failed",
        };
        writeln!(out, "{key}: {label}")?;
    }
    for (key, err) in store.failed_partitions() {
        writeln!(out, "  {key}: {err}")?;
    }
    Ok(())
}

fn repl(
    session: &mut Session<Arc<DictionaryStore<DictSource>>, LongestMatchSegmenter>,
    store: &DictionaryStore<DictSource>,
    settings: &Settings,
) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout();
    let mut line = String::new();
    let mut committed = String::new();
    writeln!(out, "pinyin ime demo | dict: {}", settings.dictionary.path.display())?;
    writeln!(out, "输入拼音后回车。输入 :q 退出。")?;
    out.flush()?;

    loop {
        line.clear();
        print!("pinyin> ");
        out.flush()?;
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == ":q" || input == ":quit" || input == ":exit" {
            break;
        }
        let raw = sanitize_input(input);
        if raw.is_empty() {
            writeln!(out, "(忽略：只接受 a-z)")?;
            continue;
        }
        if raw.len() > settings.input.max_len {
            writeln!(out, "(输入过长，只保留前 {} 个字母)", settings.input.max_len)?;
        }

        session.handle(InputEvent::Clear);
        for ch in raw.chars() {
            session.handle(InputEvent::Char(ch));
        }
        let failed = store.failed_partitions();
        if !failed.is_empty() {
            warn!(count = failed.len(), "部分词典分区加载失败");
        }

        let ui = session.ui_state();
        writeln!(out, "> {}", ui.preedit)?;
        for (i, c) in ui.candidate_list.iter().take(PAGE_SIZE).enumerate() {
            let n = i + 1;
            match &c.comment {
                Some(comment) => writeln!(out, "{n}. {}\t({comment})", c.text)?,
                None => writeln!(out, "{n}. {}", c.text)?,
            }
        }
        if ui.candidate_list.len() > PAGE_SIZE {
            writeln!(out, "   …共 {} 个候选", ui.candidate_list.len())?;
        }

        loop {
            line.clear();
            print!("select [1-{}] (Enter=1, 0=raw)> ", ui.candidate_list.len().min(PAGE_SIZE));
            out.flush()?;
            if io::stdin().read_line(&mut line)? == 0 {
                return Ok(());
            }
            let sel = line.trim();
            let event = match sel {
                "" => InputEvent::Space,
                "0" => InputEvent::Enter,
                _ => match sel.parse::<usize>() {
                    Ok(n) if (1..=PAGE_SIZE).contains(&n) => InputEvent::Select(n - 1),
                    _ => {
                        writeln!(out, "无效选择，请输入 1-9 / 0 / 直接回车")?;
                        continue;
                    }
                },
            };
            let (_ui, actions) = session.handle(event);
            let Some(Action::Commit(text)) = actions.into_iter().next() else {
                writeln!(out, "无效选择，请输入 1-9 / 0 / 直接回车")?;
                continue;
            };
            committed.push_str(&text);
            writeln!(out, "commit: {text}")?;
            writeln!(out, "output: {committed}")?;
            break;
        }
    }

    Ok(())
}

fn sanitize_input(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}
