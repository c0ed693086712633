use anyhow::Result;
use clap::Args;
use solvesphere_core::module::{catalog, AppMode};

#[derive(Args)]
pub struct ModulesArgs {
    /// Show only one mode's modules (student or business)
    #[arg(long, value_parser = super::parse_mode)]
    pub mode: Option<AppMode>,
}

pub fn run(args: ModulesArgs) -> Result<()> {
    let modules = match args.mode {
        Some(mode) => catalog::modules_for_mode(mode),
        None => catalog::builtin_modules(),
    };

    for module in modules {
        let kind = if module.is_visual() { "visual" } else { "text" };
        println!("{:<20} [{:<8}] {} - {}", module.id, module.mode, kind, module.title);
        println!("{:<20}            {}", "", module.description);
    }

    Ok(())
}
