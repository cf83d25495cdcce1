use clap::{Parser, Subcommand};
use playbook::prelude::*;
use playbook::store::{ImportConflict, import_into, load_or_placeholder};
use playbook::template::{extract_variables, html_to_text};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Author, inspect and run call-script playbooks
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the playbook files (overrides the configuration)
    #[arg(short, long, global = true, env = "PLAYBOOKS_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored playbooks
    List,
    /// Print a full text export of a playbook
    Export {
        name: String,
        /// Write the export to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Auto-layout a playbook's canvas and save it
    Layout { name: String },
    /// Rename a playbook
    Rename { old_name: String, new_name: String },
    /// Copy a playbook under a new name
    Copy { source: String, new_name: String },
    /// Delete a playbook
    Delete { name: String },
    /// Import a playbook JSON file into the store
    Import {
        file: PathBuf,
        /// Store under this name (defaults to the file name)
        #[arg(long = "as")]
        name: Option<String>,
        /// Replace an existing playbook of the same name
        #[arg(long, conflicts_with = "rename_to")]
        overwrite: bool,
        /// Store under this name if the target name is taken
        #[arg(long)]
        rename_to: Option<String>,
    },
    /// Walk through a playbook interactively as an agent would during a call
    Run { name: Option<String> },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playbook=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!(
                "Failed to load configuration '{}': {}",
                path.display(),
                e
            ))
        }),
        None => Config::default(),
    };
    if let Some(dir) = cli.dir {
        config.playbooks_dir = dir;
    }
    let mut store = FileStore::new(&config.playbooks_dir);

    match cli.command {
        Command::List => {
            let names = store
                .list()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to list playbooks: {}", e)));
            for name in names {
                println!("{}", name);
            }
        }
        Command::Export { name, out } => {
            let document = load(&store, &name);
            let generated_at = chrono::Local::now().naive_local();
            let export = DocumentExport::new(&document, &name, generated_at)
                .with_depth_limit(config.export_depth_limit)
                .to_string();
            match out {
                Some(path) => {
                    fs::write(&path, export).unwrap_or_else(|e| {
                        exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
                    });
                    println!("Export written to {}", path.display());
                }
                None => print!("{}", export),
            }
        }
        Command::Layout { name } => {
            let mut document = load(&store, &name);
            let layout = document.apply_layout(&config.layout);
            store
                .save(&name, &document)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to save '{}': {}", name, e)));
            println!(
                "Laid out {} reachable and {} orphaned steps.",
                layout.ranked.len(),
                layout.orphans.len()
            );
        }
        Command::Rename { old_name, new_name } => {
            store
                .rename(&old_name, &new_name)
                .unwrap_or_else(|e| exit_with_error(&format!("Rename failed: {}", e)));
        }
        Command::Copy { source, new_name } => {
            store
                .copy(&source, &new_name)
                .unwrap_or_else(|e| exit_with_error(&format!("Copy failed: {}", e)));
        }
        Command::Delete { name } => {
            store
                .delete(&name)
                .unwrap_or_else(|e| exit_with_error(&format!("Delete failed: {}", e)));
        }
        Command::Import {
            file,
            name,
            overwrite,
            rename_to,
        } => {
            let json = fs::read_to_string(&file).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read '{}': {}", file.display(), e))
            });
            let name = name.unwrap_or_else(|| {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| exit_with_error("Import file has no file name; use --as"))
            });
            let conflict = match (overwrite, rename_to) {
                (true, _) => ImportConflict::Overwrite,
                (false, Some(alternative)) => ImportConflict::RenameTo(alternative),
                (false, None) => ImportConflict::Abort,
            };
            let key = import_into(&mut store, &name, &json, conflict)
                .unwrap_or_else(|e| exit_with_error(&format!("Import failed: {}", e)));
            println!("Imported as {}", key);
        }
        Command::Run { name } => {
            let name = name.unwrap_or_else(|| config.default_playbook.clone());
            let document = load_or_placeholder(&store, &name);
            run_call(&document);
        }
    }
}

fn load(store: &FileStore, name: &str) -> PlaybookDocument {
    store
        .load(name)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", name, e)))
}

/// Runs one call through the playbook, prompting for every input a step needs.
fn run_call(document: &PlaybookDocument) {
    let mut call = Traversal::new(document);
    println!("--- Playbook Call ---");

    loop {
        let Some(node) = call.current_node() else {
            println!("This playbook has no steps.");
            break;
        };
        println!("\n== [{}] {} ==", node.kind().display_name(), node.label());

        match &node.data {
            NodeData::Script(data) => println!("{}", html_to_text(&data.text)),
            NodeData::CarrierLookup(_) => run_carrier_step(&mut call),
            NodeData::Checklist(data) => {
                for item in ChecklistItem::parse_all(&data.items) {
                    run_checklist_item(&mut call, &node.id, &item);
                }
            }
            NodeData::WordTrack(data) => {
                for variable in extract_variables(&data.template) {
                    let value = prompt_for_input(&variable, None);
                    call.answers_mut().set_variable(&node.id, &variable, &value);
                }
                if let Some(filled) = call.current_word_track() {
                    println!("\n{}", html_to_text(&filled));
                }
            }
            NodeData::Quote(_) => run_quote_step(&mut call),
        }

        let options = call.current_options();
        if options.is_empty() {
            println!("\n(end of call)");
            break;
        }

        println!();
        for (i, choice) in options.iter().enumerate() {
            println!("  {}: {}", i + 1, choice.label);
        }
        println!("  b: jump back | r: restart | q: quit");

        let input = prompt_for_input("Enter choice", Some("1"));
        match input.as_str() {
            "q" => break,
            "r" => call.reset(),
            "b" => jump_back(&mut call),
            _ => match input.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    if let Err(e) = call.choose(n - 1) {
                        println!("Cannot continue: {}", e);
                    }
                }
                _ => println!("Invalid choice."),
            },
        }
    }

    match ComplianceLog::from_history(call.history()) {
        Some(log) => println!("\n{}", log.render_now()),
        None => println!("\nNo compliance checks were recorded."),
    }
}

fn run_carrier_step(call: &mut Traversal<'_>) {
    let document = call.document();
    let carriers: Vec<(&String, &Carrier)> = document.carriers.iter().collect();
    if carriers.is_empty() {
        println!("No carriers are configured.");
        return;
    }

    for (i, (_, carrier)) in carriers.iter().enumerate() {
        println!("  {}: {}", i + 1, carrier.name);
    }
    let picked = prompt_for_input("Select carrier", Some("1"));
    let carrier = picked
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| carriers.get(i));
    let Some((key, _)) = carrier else {
        println!("Invalid carrier.");
        return;
    };
    if let Err(e) = call.select_carrier(key) {
        println!("{}", e);
        return;
    }

    let default_type = call.effective_call_type().unwrap_or_default().to_string();
    println!("Call types: {}", document.call_types.join(", "));
    let call_type = prompt_for_input("Call type", Some(&default_type));
    call.select_call_type(&call_type);

    if let Some(script) = call.current_carrier_script() {
        println!("\n{}", html_to_text(&script.html));
    }
}

fn run_checklist_item(call: &mut Traversal<'_>, node_id: &str, item: &ChecklistItem) {
    if item.is_yes_no() {
        let answer = prompt_for_input(&format!("{} (y/n, blank to skip)", item.text), None);
        let answer = match answer.to_lowercase().as_str() {
            "y" | "yes" => Some(ChecklistAnswer::Yes),
            "n" | "no" => Some(ChecklistAnswer::No),
            _ => None,
        };
        call.answers_mut()
            .set_checklist_answer(node_id, &item.text, answer);
    } else {
        let done = prompt_for_input(&format!("{} done? (y/N)", item.text), Some("n"));
        let answer = matches!(done.to_lowercase().as_str(), "y" | "yes").then_some(ChecklistAnswer::Checked);
        call.answers_mut()
            .set_checklist_answer(node_id, &item.text, answer);
    }
}

fn run_quote_step(call: &mut Traversal<'_>) {
    let document = call.document();
    let settings = &document.quote_settings;

    let form = call.quote_form_mut();
    form.down_payment = prompt_for_input("Down payment", None);
    form.monthly = prompt_for_input("Monthly premium", None);
    form.term = prompt_for_input("Term", Some(&form.term.clone()));

    if !document.carriers.is_empty() {
        for (i, carrier) in document.carriers.values().enumerate() {
            println!("  {}: {}", i + 1, carrier.name);
        }
        let picked = prompt_for_input("Carrier (blank for none)", None);
        form.carrier_id = picked
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| document.carriers.get_index(i))
            .map(|(id, _)| id.clone());
    }

    println!("\nPolicy coverages:");
    for field in settings.policy_fields() {
        if confirm(&field.label) {
            form.toggle_policy_coverage(&field.id);
            if field.has_input {
                let hint = field.placeholder.as_deref().unwrap_or("value");
                let value = prompt_for_input(&format!("  {} ({})", field.label, hint), None);
                form.set_policy_value(&field.id, &value);
            }
        }
    }

    let count = prompt_for_input("Number of vehicles", Some("1"))
        .parse::<usize>()
        .unwrap_or(1)
        .max(1);
    for index in 0..count {
        if index > 0 {
            form.add_vehicle();
        }
        let name = prompt_for_input(&format!("Vehicle {} name", index + 1), None);
        if index > 0 && confirm("Same coverages as vehicle 1") {
            form.match_first_vehicle(index);
            if let Some(vehicle) = form.vehicle_mut(index) {
                vehicle.name = name;
            }
            continue;
        }
        let Some(vehicle) = form.vehicle_mut(index) else {
            continue;
        };
        vehicle.name = name;
        for field in settings.vehicle_fields() {
            if confirm(&field.label) {
                vehicle.toggle_coverage(&field.id);
                if field.has_input {
                    let hint = field.placeholder.as_deref().unwrap_or("value");
                    let value = prompt_for_input(&format!("  {} ({})", field.label, hint), None);
                    vehicle.set_value(&field.id, &value);
                }
            }
        }
    }

    if let Some(script) = call.current_quote_script() {
        println!("\n{}", html_to_text(&script));
    }
}

fn jump_back(call: &mut Traversal<'_>) {
    if call.history().is_empty() {
        println!("Nothing to go back to.");
        return;
    }
    for (i, entry) in call.history().iter().enumerate() {
        println!("  {}: {} -> {}", i + 1, entry.node().label(), entry.chosen_label());
    }
    let picked = prompt_for_input("Return to step", None);
    let index = picked.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
    match index.map(|i| call.jump_to(i)) {
        Some(Ok(())) => {}
        Some(Err(e)) => println!("{}", e),
        None => println!("Invalid step."),
    }
}

fn confirm(question: &str) -> bool {
    let answer = prompt_for_input(&format!("{}? (y/N)", question), Some("n"));
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to write prompt: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read input: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
