use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use libindic::{new_session, IndicConfig, IndicSource, KeyEvent, KeyboardSession, Language};
use libindic_core::units::unit_to_byte;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Interactive Indic keyboard: type into a buffer and watch suggestions.
#[derive(Debug, Parser)]
#[command(name = "libindic", version, about)]
struct Args {
    /// Language code (hi, ta, te, bn, en, ...)
    #[arg(long)]
    lang: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Word list for offline suggestions (`word<TAB>frequency` per line)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Never query the network
    #[arg(long)]
    offline: bool,
}

const HELP: &str = "\
commands:
  <text>             insert text at the cursor
  :del [n]           backspace n times (default 1)
  :sel <cursor> <len> set cursor and selection (UTF-16 units)
  :accept <n>        accept suggestion n (1-based)
  :left | :right     move the cursor one character
  :block next|prev   page the key grid
  :keys              show the visible keys
  :shift             cycle shift (English only)
  :lang <code>       switch language
  :quit              exit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let settle = config.base.debounce() + config.base.lookup_timeout() + Duration::from_millis(20);

    let mut session = new_session(&config)?;
    println!(
        "libindic ({}, {} suggestions). Type :help for commands.",
        session.language(),
        session.pipeline().source().name()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match run_command(&mut session, &line) {
            Outcome::Quit => break,
            Outcome::Message(msg) => {
                println!("{msg}");
                continue;
            }
            Outcome::Render => {}
        }
        tokio::time::sleep(settle).await;
        render(&session);
    }

    session.shutdown();
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<IndicConfig> {
    let mut config = match &args.config {
        Some(path) => IndicConfig::load_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => IndicConfig::default(),
    };
    if let Some(lang) = &args.lang {
        config.base_mut().set_language(lang);
    }
    if let Some(path) = &args.lexicon {
        config.lexicon_path = Some(path.clone());
    }
    if args.offline {
        config.cloud_enabled = false;
    }
    Ok(config)
}

enum Outcome {
    Render,
    Message(String),
    Quit,
}

fn run_command(session: &mut KeyboardSession<IndicSource>, line: &str) -> Outcome {
    let Some(command) = line.strip_prefix(':') else {
        session.insert(line);
        return Outcome::Render;
    };
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match name {
        "quit" | "q" => Outcome::Quit,
        "help" => Outcome::Message(HELP.to_string()),
        "del" => {
            let times = args.first().and_then(|n| n.parse().ok()).unwrap_or(1usize);
            for _ in 0..times {
                session.process_key(KeyEvent::Delete);
            }
            Outcome::Render
        }
        "sel" => match (parse_at(&args, 0), parse_at(&args, 1)) {
            (Some(cursor), Some(len)) => {
                session.set_selection(cursor, len);
                Outcome::Render
            }
            _ => Outcome::Message("usage: :sel <cursor> <len>".into()),
        },
        "accept" => match parse_at(&args, 0) {
            Some(n) if n > 0 && session.accept_index(n - 1) => Outcome::Render,
            _ => Outcome::Message("no such suggestion".into()),
        },
        "left" => {
            session.move_left();
            Outcome::Render
        }
        "right" => {
            session.move_right();
            Outcome::Render
        }
        "block" => {
            let event = match args.first().copied() {
                Some("prev") => KeyEvent::BlockBack,
                _ => KeyEvent::BlockForward,
            };
            session.process_key(event);
            Outcome::Message(keys_line(session))
        }
        "keys" => Outcome::Message(keys_line(session)),
        "shift" => {
            session.process_key(KeyEvent::Shift);
            Outcome::Message(format!("shift: {:?}\n{}", session.shift(), keys_line(session)))
        }
        "lang" => match args.first().and_then(|code| Language::lookup(code)) {
            Some(language) => {
                session.set_language(language);
                Outcome::Message(keys_line(session))
            }
            None => Outcome::Message("unknown language".into()),
        },
        _ => Outcome::Message(format!("unknown command :{name} (try :help)")),
    }
}

fn parse_at(args: &[&str], index: usize) -> Option<usize> {
    args.get(index).and_then(|s| s.parse().ok())
}

fn keys_line(session: &KeyboardSession<IndicSource>) -> String {
    format!(
        "[{}/{}] {}",
        session.block_index() + 1,
        session.layout().block_count(),
        session.visible_block().join(" ")
    )
}

fn render(session: &KeyboardSession<IndicSource>) {
    let text = session.text();
    let at = unit_to_byte(text, session.cursor());
    println!("{}|{}", &text[..at], &text[at..]);

    let suggestions = session.suggestions();
    if !suggestions.is_empty() {
        let numbered: Vec<String> = suggestions
            .words
            .iter()
            .enumerate()
            .map(|(i, w)| format!("{}:{w}", i + 1))
            .collect();
        println!("  {}", numbered.join("  "));
    }
}
