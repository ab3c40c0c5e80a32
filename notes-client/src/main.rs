use notes_client::{FileStorage, NoteClient, TracingNotifier};
use tracing_subscriber::EnvFilter;

use std::env;

const USAGE: &str = "usage: notenest <list | get ID | search TERM | tags | categories | add-category NAME>";

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let base_url = env::var("NOTENEST_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let cache_dir = env::var("NOTENEST_CACHE_DIR").unwrap_or_else(|_| ".notenest".to_string());

    let client = NoteClient::new(&base_url, FileStorage::new(cache_dir), TracingNotifier)
        .unwrap_or_else(|e| panic!("failed to create client: {e}"));

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["list"] => {
            for note in client.list_notes().await {
                println!("{:>5}  {:<12} {}", note.id, note.category, note.title);
            }
        }
        ["get", id] => {
            let Ok(id) = id.parse::<i64>() else {
                eprintln!("invalid note id '{id}'");
                std::process::exit(2);
            };
            match client.get_note(id).await {
                Some(note) => {
                    println!("{} [{}] {}", note.title, note.category, note.tags.join(", "));
                    println!("{}", note.content);
                }
                None => {
                    eprintln!("note {id} not found");
                    std::process::exit(1);
                }
            }
        }
        ["search", term] => {
            for note in client.search_notes(term).await {
                println!("{:>5}  {}", note.id, note.title);
            }
        }
        ["tags"] => {
            for tag in client.list_tags().await {
                println!("{tag}");
            }
        }
        ["categories"] => {
            for category in client.list_categories().await {
                let marker = if category.is_default { "*" } else { " " };
                println!("{:>5} {marker} {}", category.id, category.name);
            }
        }
        ["add-category", name] => {
            if client.create_category(name).await.is_err() {
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}
