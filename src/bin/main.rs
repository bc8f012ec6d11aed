use clap::Parser;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use pos_core::corpus::load_corpus;
use pos_core::input::{self, Command};
use pos_core::report::{self, tag_color, CellKind, Report};
use pos_core::{SessionConfig, Tag, TaggingSession};
use std::error::Error;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pos_tagger")]
#[command(about = "Tag example sentences and build HMM emission/transition tables")]
struct Args {
    /// Sentences to tag before the tables can be computed
    #[arg(
        long,
        env = "POS_MIN_SENTENCES",
        default_value_t = pos_core::config::DEFAULT_MIN_SENTENCES
    )]
    min_sentences: usize,

    /// Keep transition counts up to date per sentence instead of recounting
    #[arg(long)]
    incremental: bool,

    /// Pre-tagged sentences (JSON) to start the session with
    #[arg(long)]
    corpus: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = SessionConfig::default()
        .with_min_sentences(args.min_sentences)
        .with_incremental_transitions(args.incremental);
    let mut session = TaggingSession::with_config(config);

    if let Some(path) = &args.corpus {
        let loaded = session.load_corpus(load_corpus(path)?)?;
        println!("Loaded {} tagged sentences from '{}'", loaded, path.display());
    }

    println!("POS Tagging Session. Type 'exit' to quit.");
    println!("---------------------------------------------------------------");

    loop {
        print_ui(&session)?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            break;
        }
        let cmd = line.trim();

        let pending = session.pending_words().map(<[String]>::len);
        let outcome = match input::parse_line(cmd, pending) {
            Ok(Command::Exit) => break,
            Ok(command) => run_command(&mut session, command),
            Err(e) => Err(e.into()),
        };

        if let Err(e) = outcome {
            print_colored(Color::Yellow, &format!("\n{}\n", e))?;
        }
    }

    println!("\n{} sentences tagged.", session.corpus().len());
    Ok(())
}

fn run_command(session: &mut TaggingSession, command: Command<'_>) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Exit => {}
        Command::Tables => show_tables(session)?,
        Command::Discard => {
            session.discard_sentence();
        }
        Command::Submit => {
            if session.pending_words().is_some() {
                let stored = session.submit_sentence()?;
                println!("\nStored: {}", stored.words.join(" "));
            }
        }
        Command::Sentence(text) => {
            session.begin_sentence(text)?;
        }
        Command::TagAll(tags) => {
            for (position, tag) in tags.into_iter().enumerate() {
                session.assign_tag(position, tag)?;
            }
        }
        Command::Tag { position, tag } => {
            session.assign_tag(position, tag)?;
        }
    }
    Ok(())
}

fn show_tables(session: &TaggingSession) -> Result<(), Box<dyn Error>> {
    let tables = session.compute_tables()?;
    println!(
        "\nSuccessfully tagged {} sentences!\n",
        session.corpus().len()
    );
    for report in report::reports(&tables) {
        print_report(&report)?;
    }
    print!("\nPress [Enter] to continue...");
    stdout().flush()?;
    let mut pause = String::new();
    stdin().read_line(&mut pause)?;
    Ok(())
}

fn print_ui(session: &TaggingSession) -> Result<(), Box<dyn Error>> {
    println!("\n---------------------------------------------------------------");
    println!("Tagged sentences: {}", session.corpus().len());
    for (i, sentence) in session.corpus().iter().enumerate() {
        print!("  {}.", i + 1);
        for (position, word) in sentence.words.iter().enumerate() {
            let name = sentence.tags.get(&position).map_or("?", String::as_str);
            print!(" {}/", word);
            print_colored(tag_color(Tag::from_name(name)), name)?;
        }
        println!();
    }

    match session.pending_words() {
        None => {
            if session.can_compute_tables() {
                print_colored(
                    Color::Green,
                    "\nEnough sentences! Type ':tables' to compute the HMM tables.\n",
                )?;
            } else {
                println!(
                    "\n{} more sentence(s) needed before computing tables.",
                    session.sentences_needed()
                );
            }
            print!("\nEnter a sentence to tag parts of speech\n> ");
        }
        Some(words) => {
            let choices: Vec<String> = Tag::CANONICAL
                .iter()
                .filter_map(|tag| tag.code().map(|code| format!("{} ({})", tag, code.as_char())))
                .collect();
            println!("\nTag each word: {}", choices.join(", "));
            for (position, word) in words.iter().enumerate() {
                match session.pending_tag(position) {
                    Some(tag) => print_colored(
                        tag_color(Some(tag)),
                        &format!("  {}: {} [{}]\n", position + 1, word, tag),
                    )?,
                    None => println!("  {}: {} [Select POS]", position + 1, word),
                }
            }
            if session.is_fully_tagged() {
                println!("\nPress [Enter] to store this sentence, ':discard' to drop it.");
            } else {
                println!("\nTag all words before proceeding to the next sentence.");
                println!("Use '<word number> <tag>' or one of n/v/m per word, e.g. 'n v n'.");
            }
            print!("> ");
        }
    }
    stdout().flush()?;
    Ok(())
}

fn print_report(report: &Report) -> Result<(), Box<dyn Error>> {
    let widths = report.column_widths();
    print_colored(Color::Cyan, &format!("\n{}\n", report.title))?;

    let header: Vec<String> = report
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{h:<w$}"))
        .collect();
    println!("{}", header.join("  "));

    let mut out = stdout();
    for row in &report.rows {
        for (i, (cell, &w)) in row.iter().zip(&widths).enumerate() {
            let sep = if i == 0 { "" } else { "  " };
            match cell.kind {
                CellKind::Label => execute!(out, Print(format!("{sep}{:<w$}", cell.text)))?,
                CellKind::Zero => execute!(
                    out,
                    SetForegroundColor(Color::Red),
                    Print(format!("{sep}{:>w$}", cell.text)),
                    ResetColor
                )?,
                CellKind::NonZero => execute!(
                    out,
                    SetForegroundColor(Color::Green),
                    Print(format!("{sep}{:>w$}", cell.text)),
                    ResetColor
                )?,
            }
        }
        execute!(out, Print("\n"))?;
    }
    Ok(())
}

fn print_colored(color: Color, text: &str) -> Result<(), Box<dyn Error>> {
    let mut out = stdout();
    execute!(out, SetForegroundColor(color), Print(text), ResetColor)?;
    out.flush()?;
    Ok(())
}
