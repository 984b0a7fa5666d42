use clap::{Parser, Subcommand};

use ide_layout::config::{self, Config};
use ide_layout::{FileStore, LayoutEvent, LayoutManager, LayoutState, PanelId};

#[derive(Parser)]
#[command(name = "ide-layout", about = "Inspect and change the IDE panel layout")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current layout as JSON
    Show,
    /// List layout presets
    Ls,
    /// Apply a layout preset
    Apply {
        /// Preset name, e.g. "focus"
        name: String,
    },
    /// Show or hide a panel
    Toggle {
        /// sidebar, editorArea, terminal or aiPanel
        panel: String,
    },
    /// Set a panel's width or height (clamped to its bounds)
    Resize { panel: String, size: f64 },
    /// Go back to the default preset
    Reset,
    /// Print the layout state file location
    Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_file = config::config_path();
    let loaded = Config::try_load(&config_file);
    let config = match &loaded {
        Ok(c) => c.clone(),
        Err(_) => Config::default(),
    };
    ide_layout::logging::init(config.log_filter.as_deref());
    if let Err(e) = &loaded {
        tracing::warn!(path = %config_file.display(), "invalid config, using defaults: {:#}", e);
    }

    let store = FileStore::new(config.state_file.clone());
    let mut manager = LayoutManager::load(
        config.preset_table(),
        Box::new(store),
        &config.initial_layout,
    );
    manager.subscribe(|event: &LayoutEvent, state: &LayoutState| {
        tracing::info!(?event, layout = %state.current_layout_name, "layout changed");
    });

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => {
            println!("{}", serde_json::to_string_pretty(&manager.state())?);
        }
        Commands::Ls => {
            let current = manager.current_layout_name().to_string();
            for preset in manager.list_presets() {
                let marker = if preset.name == current { "*" } else { " " };
                println!(
                    "{} {:<12} {:<16} {}",
                    marker, preset.name, preset.display_label, preset.description
                );
            }
        }
        Commands::Apply { name } => {
            if !manager.apply_layout(&name) {
                anyhow::bail!("unknown layout: {}", name);
            }
            println!("applied {}", name);
        }
        Commands::Toggle { panel } => {
            let id = PanelId::parse(&panel)?;
            let visible = manager.toggle_panel(id);
            println!("{} {}", id, if visible { "shown" } else { "hidden" });
        }
        Commands::Resize { panel, size } => {
            let id = PanelId::parse(&panel)?;
            let applied = manager.resize_panel(id, size)?;
            println!("{} {}", id, applied);
        }
        Commands::Reset => {
            manager.reset_to_default();
            println!("applied {}", ide_layout::DEFAULT_LAYOUT);
        }
        Commands::Path => {
            println!("{}", config.state_file.display());
        }
    }

    if manager.persist_failures() > 0 {
        eprintln!(
            "ide-layout: could not save layout to {}",
            config.state_file.display()
        );
    }
    Ok(())
}
