//! Command-line front end for the pet store.
//!
//! # Responsibility
//! - Collect data-file and logging configuration from flags and env.
//! - Translate subcommands into boundary requests and print responses.

use clap::{Parser, Subcommand};
use petstore_api::{ApiRequest, ApiResponse, PetApi};
use petstore_core::{default_log_level, init_logging};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "petstore")]
#[command(about = "Manage pet records stored in a JSON file", version)]
struct Args {
    /// Collection file; created with `[]` when missing.
    #[arg(long, env = "PETSTORE_DATA_FILE", default_value = "pets.json")]
    data_file: PathBuf,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a pet with default attributes.
    Birth { name: String },
    /// List every pet.
    List,
    /// Show one pet.
    Get { id: String },
    /// Change selected attributes of a pet.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        food: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        age: Option<f64>,
    },
    /// Remove a pet.
    Delete { id: String },
    /// Send a raw request, e.g. `request PATCH /pets/1 '{"age":2}'`.
    Request {
        method: String,
        path: String,
        body: Option<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("petstore: {err}");
            return ExitCode::FAILURE;
        }
    }

    let api = match PetApi::open(&args.data_file) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("petstore: {err}");
            return ExitCode::FAILURE;
        }
    };

    let response = api.handle(&to_request(args.command));
    print_response(&response);
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn to_request(command: Command) -> ApiRequest {
    match command {
        Command::Birth { name } => {
            ApiRequest::new("POST", "/pets").with_body(json!({ "name": name }).to_string())
        }
        Command::List => ApiRequest::new("GET", "/pets"),
        Command::Get { id } => ApiRequest::new("GET", format!("/pets/{id}")),
        Command::Update {
            id,
            name,
            food,
            weight,
            age,
        } => {
            let mut patch = Map::new();
            if let Some(name) = name {
                patch.insert("name".to_string(), Value::from(name));
            }
            for (key, value) in [("food", food), ("weight", weight), ("age", age)] {
                if let Some(value) = value {
                    patch.insert(key.to_string(), Value::from(value));
                }
            }
            ApiRequest::new("PATCH", format!("/pets/{id}"))
                .with_body(Value::Object(patch).to_string())
        }
        Command::Delete { id } => ApiRequest::new("DELETE", format!("/pets/{id}")),
        Command::Request { method, path, body } => {
            let request = ApiRequest::new(method, path);
            match body {
                Some(body) => request.with_body(body),
                None => request,
            }
        }
    }
}

fn print_response(response: &ApiResponse) {
    println!("status={}", response.status);
    if let Some(body) = &response.body {
        match serde_json::to_string_pretty(body) {
            Ok(text) => println!("{text}"),
            Err(_) => println!("{body}"),
        }
    }
}
