use anyhow::Result;
use clap::Subcommand;
use solvesphere_core::history::HistoryRepository;
use solvesphere_infrastructure::FileHistoryRepository;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List stored history items, most recent first
    List {
        /// Display name that keys the history storage
        #[arg(long, default_value = "you")]
        user: String,
    },
    /// Print one stored result in full
    Show {
        /// Display name that keys the history storage
        #[arg(long, default_value = "you")]
        user: String,
        /// History item id (see `history list`)
        id: String,
    },
    /// Delete all stored history for a user
    Clear {
        /// Display name that keys the history storage
        #[arg(long, default_value = "you")]
        user: String,
    },
}

pub async fn run(action: HistoryAction) -> Result<()> {
    let repository = FileHistoryRepository::new()?;

    match action {
        HistoryAction::List { user } => {
            let items = repository.load(&user).await?;
            if items.is_empty() {
                println!("No history for '{user}'.");
                return Ok(());
            }
            for item in items {
                let flat = item.input.replace('\n', " ");
                let input = if flat.chars().count() > 60 {
                    let mut short: String = flat.chars().take(57).collect();
                    short.push_str("...");
                    short
                } else {
                    flat
                };
                println!(
                    "{}  {}  [{}]  {}",
                    item.id, item.timestamp, item.module_title, input
                );
            }
        }
        HistoryAction::Show { user, id } => {
            let items = repository.load(&user).await?;
            let Some(item) = items.into_iter().find(|item| item.id == id) else {
                println!("No history item '{id}' for '{user}'.");
                return Ok(());
            };
            println!("Module:  {}", item.module_title);
            println!("Input:   {}", item.input);
            println!("When:    {}", item.timestamp);
            println!();
            super::solve::print_result(&item.result);
        }
        HistoryAction::Clear { user } => {
            repository.clear(&user).await?;
            println!("History cleared for '{user}'.");
        }
    }

    Ok(())
}
