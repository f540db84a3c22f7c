use std::path::Path;
use std::process::ExitCode;
use std::{env, fs};
use util::config;

mod runner;

#[tokio::main]
async fn main() -> ExitCode {
    let db_path = config::database_path();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = env::args().collect();

    let result = match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&db_path);
            Ok(())
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await
        }
        _ => {
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Migration failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if db_path.exists() {
        match fs::remove_file(db_path) {
            Ok(()) => println!("Deleted DB: {}", db_path.display()),
            Err(err) => eprintln!("Failed to delete {}: {err}", db_path.display()),
        }
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn create_db_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            eprintln!("Failed to create DB directory {}: {err}", parent.display());
        }
    }
}
