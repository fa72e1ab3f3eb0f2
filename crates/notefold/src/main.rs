use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use notefold::{render, ReadingView};

#[derive(Parser)]
#[command(name = "notefold", about = "Render vault notes with collapsible link toggles")]
struct Cli {
    /// Root directory of the note vault.
    #[arg(long, env = "NOTEFOLD_VAULT", default_value = ".")]
    vault: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a note's reading view and print the fragment tree.
    Render {
        /// Vault-relative note path, e.g. `Welcome` or `/Notes/Ideas.md`.
        note: String,
        /// Open every toggle before printing, loading each pane.
        #[arg(long)]
        open_all: bool,
    },
    /// Change a persisted setting.
    Set {
        #[arg(value_enum)]
        key: SettingKey,
        value: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SettingKey {
    /// Only attach toggles to links that start their paragraph.
    MatchOnlyAtStart,
}

fn normalize_note_path(note: &str) -> String {
    let mut path = if note.starts_with('/') {
        note.to_string()
    } else {
        format!("/{note}")
    };
    if !path.to_lowercase().ends_with(".md") {
        path.push_str(".md");
    }
    path
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render { note, open_all } => {
            let view = ReadingView::open(&cli.vault)
                .with_context(|| format!("opening vault {}", cli.vault.display()))?;
            let path = normalize_note_path(&note);
            let mut rendered = view
                .render_note(&path)
                .await
                .with_context(|| format!("rendering {path}"))?;

            if open_all {
                // Opening a pane can register nested toggles; keep going
                // until every known toggle has been activated once.
                let mut seen = std::collections::HashSet::new();
                loop {
                    let pending: Vec<_> = rendered
                        .toggles
                        .ids()
                        .into_iter()
                        .filter(|id| !seen.contains(id))
                        .collect();
                    if pending.is_empty() {
                        break;
                    }
                    for id in pending {
                        view.toggle(&mut rendered, &id).await;
                        seen.insert(id);
                    }
                }
            }

            print!("{}", render::dump(&rendered.fragment, rendered.root));
        }
        Command::Set { key, value } => {
            let mut view = ReadingView::open(&cli.vault)
                .with_context(|| format!("opening vault {}", cli.vault.display()))?;
            match key {
                SettingKey::MatchOnlyAtStart => view.set_match_only_at_start(value)?,
            }
        }
    }

    Ok(())
}
