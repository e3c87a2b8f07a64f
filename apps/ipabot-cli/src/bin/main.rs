use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use ipabot_core::config::{resolve_with_base, Config};
use ipabot_core::dataset::{load_or_empty, JsonFileSource};
use ipabot_engine::{render_plain, ChatEngine, ChatSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

const HELP: &str = "Perintah: :clear  :debug  :rerun <pertanyaan>  :quit";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let dataset_path = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        resolve_with_base(&env::current_dir().unwrap_or_default(), &settings.data.dataset_path)
    });
    info!(path = %dataset_path.display(), "loading dataset");

    // The engine is only built once the load has settled, successfully or not.
    let source = JsonFileSource::new(&dataset_path, settings.data.root_key.as_str());
    let outcome = load_or_empty(&source);
    let opening =
        if outcome.failed { &settings.messages.load_failure } else { &settings.messages.greeting };
    println!("Bot: {}", opening);
    println!("{}", HELP);

    let engine = ChatEngine::new(&outcome.dataset, &settings);
    let mut chat = ChatSession::new(engine, &settings.messages);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("Anda: ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            ":quit" | ":q" => break,
            ":clear" => {
                chat.clear();
                println!("Bot: Percakapan dibersihkan.");
            }
            ":debug" => {
                let engine = chat.engine();
                let session = engine.session();
                println!(
                    "cache={} scoring_runs={} last_topic={:?} last_subtopic={:?} follow_ups={:?}",
                    engine.cache_len(),
                    engine.scoring_runs(),
                    session.last_topic,
                    session.last_subtopic,
                    session.follow_ups
                );
                if let Some(m) = engine.last_match() {
                    println!(
                        "last_match={} phase={:?} confidence={:.3}",
                        m.key, m.phase, m.confidence
                    );
                }
            }
            cmd if cmd.starts_with(":rerun") => {
                let query = cmd.trim_start_matches(":rerun").trim();
                if query.is_empty() {
                    continue;
                }
                match chat.engine_mut().rerun(query) {
                    Ok(answer) => println!("Bot: {}", render_plain(&answer)),
                    Err(e) => {
                        tracing::warn!("rerun failed: {}", e);
                        println!("Bot: {}", settings.messages.processing_error);
                    }
                }
            }
            input => {
                if let Some(reply) = chat.send(input) {
                    println!("Bot: {}", reply.render_plain());
                }
            }
        }
    }
    Ok(())
}
