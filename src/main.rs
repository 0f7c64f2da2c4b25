use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

use habitgrid::{
    Config, Dashboard, Database, Profile, Session,
    cli::{self, Cli, Commands},
    logging, utils,
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // An explicit config file keeps logs beside it so separate setups never share a log dir
    let (mut config, config_path, log_dir) = match cli.config.as_deref() {
        Some(path) => {
            let path = utils::expand_path(path);
            let config = Config::load_from_path(&path)?;
            let log_dir = path
                .parent()
                .map(|parent| parent.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"));
            (config, path, log_dir)
        }
        None => {
            let config = Config::load_with_profile(profile)?;
            let log_dir = utils::get_data_dir(profile)
                .map(|dir| dir.join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"));
            (config, Config::get_config_path(profile)?, log_dir)
        }
    };
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    // Logging is best effort; the app works without it
    let _log_guard = match logging::init(&log_dir, &config.log_level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    let command = cli.command.unwrap_or(Commands::Tui);
    if let Commands::Theme { name } = &command {
        cli::handle_theme(name.clone(), &mut config, &config_path)?;
        return Ok(());
    }

    let session = Session::resolve(cli.user.as_deref(), config.user.as_deref())?;
    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
        session,
        config.store_timeout(),
    )?;
    tracing::info!(db = %db_path.display(), "opened database");

    let mut dashboard = Dashboard::new(db, utils::today());

    match command {
        Commands::Tui => {
            let app = habitgrid::tui::App::new(config, dashboard)?;
            habitgrid::tui::run_event_loop(app)?;
        }
        Commands::AddHabit { name, description, color } => {
            dashboard.load()?;
            cli::handle_add_habit(name, description, color, &mut dashboard)?;
        }
        Commands::EditHabit { id, name, description, color } => {
            cli::handle_edit_habit(id, name, description, color, &mut dashboard)?;
        }
        Commands::DeleteHabit { id } => {
            cli::handle_delete_habit(id, &mut dashboard)?;
        }
        Commands::Habits => {
            dashboard.load()?;
            cli::handle_list_habits(&dashboard)?;
        }
        Commands::Log { habit_id, status, date } => {
            cli::handle_log(habit_id, status, date, &mut dashboard)?;
        }
        Commands::AddTask { title, date } => {
            cli::handle_add_task(title, date, &mut dashboard)?;
        }
        Commands::Stats { date, json } => {
            dashboard.load()?;
            cli::handle_stats(date, json, &dashboard)?;
        }
        Commands::Theme { .. } => {}
    }

    Ok(())
}
