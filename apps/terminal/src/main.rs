mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{AdminClient, AdminClientOptions, ClientEvent, HttpCommandGateway, View};
use shared::domain::{DirectoryEntry, DiskDescriptor, PartitionDescriptor};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(about = "Text frontend for the disk administration backend")]
struct Args {
    /// Backend base URL; overrides client.toml and environment.
    #[arg(long)]
    backend_url: Option<String>,
    /// A .smia script to load into the command buffer on startup.
    #[arg(long)]
    script: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(url) = args.backend_url {
        settings.backend_url = url;
    }

    let gateway = HttpCommandGateway::new(&settings.backend_url)
        .with_context(|| format!("cannot use backend url '{}'", settings.backend_url))?;
    let client = AdminClient::with_options(
        Arc::new(gateway),
        AdminClientOptions {
            sample_fallback: settings.sample_fallback,
        },
    );

    if let Some(script) = args.script {
        match client.load_script(&script).await {
            Ok(()) => println!("script loaded into the command buffer; `run` executes it"),
            Err(err) => println!("{err}"),
        }
    }

    spawn_event_printer(&client);

    println!("disk-admin terminal, backend {}", settings.backend_url);
    println!("type `help` for commands");

    let mut disks: Vec<DiskDescriptor> = Vec::new();
    let mut partitions: Vec<PartitionDescriptor> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let view = client.snapshot().await.view;
        print_prompt(view, &client).await;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();
        debug!(verb, "operator action");

        match verb {
            "help" => print_help(),
            "quit" | "exit" => break,
            "login" => match rest.as_slice() {
                [user, pass, id] => match client.login(user, pass, id).await {
                    Ok(transcript) => println!("{transcript}"),
                    Err(err) => println!("{err}"),
                },
                _ => println!("usage: login <user> <password> <partition-id>"),
            },
            "logout" => println!("{}", client.logout().await),
            "disks" => match client.browse_disks().await {
                Ok(list) => {
                    disks = list;
                    print_disks(&disks);
                }
                Err(err) => println!("{err}"),
            },
            "select" => {
                let Some(index) = rest.first().and_then(|raw| raw.parse::<usize>().ok()) else {
                    println!("usage: select <number>");
                    continue;
                };
                match view {
                    View::DiskSelector => match disks.get(index).cloned() {
                        Some(disk) => match client.select_disk(disk).await {
                            Ok(list) => {
                                partitions = list;
                                print_partitions(&partitions);
                            }
                            Err(err) => println!("{err}"),
                        },
                        None => println!("no disk #{index}"),
                    },
                    View::PartitionSelector => match partitions.get(index) {
                        Some(partition) => {
                            let id = partition.id.clone();
                            match client.select_partition(&id).await {
                                Ok(entries) => print_entries(&entries),
                                Err(err) => println!("{err}"),
                            }
                        }
                        None => println!("no partition #{index}"),
                    },
                    _ => println!("nothing to select in this view"),
                }
            }
            "open" => {
                let Some(name) = rest.first() else {
                    println!("usage: open <entry-name>");
                    continue;
                };
                let snapshot = client.snapshot().await;
                let Some(entry) = snapshot.listing.iter().find(|e| e.name == *name).cloned()
                else {
                    println!("no entry named '{name}' in the current listing");
                    continue;
                };
                match client.navigate_into(&entry).await {
                    Ok(client_core::BrowseOutcome::Listing(entries)) => print_entries(&entries),
                    Ok(client_core::BrowseOutcome::Preview(preview)) => {
                        println!("--- {} ---", preview.path);
                        println!("{}", preview.contents);
                        println!("--- end (close with `close`) ---");
                    }
                    Err(err) => println!("{err}"),
                }
            }
            "up" => match client.navigate_up().await {
                Ok(entries) => print_entries(&entries),
                Err(err) => println!("{err}"),
            },
            "close" => client.close_preview().await,
            "back" => {
                client.back().await;
            }
            "terminal" => {
                client.back_to_terminal().await;
            }
            "cat" => match rest.first() {
                Some(path) => match client.read_file(path).await {
                    Ok(preview) => println!("{}", preview.contents),
                    Err(err) => println!("{err}"),
                },
                None => println!("usage: cat <path>"),
            },
            "cmd" => {
                if rest.is_empty() {
                    println!("usage: cmd <command text>");
                } else {
                    println!("{}", client.run_commands(&rest.join(" ")).await);
                }
            }
            "run" => println!("{}", client.execute_buffer().await),
            "load" => match rest.first() {
                Some(path) => match client.load_script(PathBuf::from(path).as_path()).await {
                    Ok(()) => println!("script loaded; `run` executes it"),
                    Err(err) => println!("{err}"),
                },
                None => println!("usage: load <file.smia>"),
            },
            "show" => print_snapshot(&client).await,
            other => println!("unknown action '{other}'; type `help`"),
        }
    }

    Ok(())
}

fn spawn_event_printer(client: &Arc<AdminClient>) {
    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                ClientEvent::SampleDataSubstituted { command } => {
                    println!("(showing sample data; backend reply to `{command}` was not interpretable)");
                }
                ClientEvent::SessionOpened {
                    username,
                    partition_id,
                } => println!("(session: {username} @ {partition_id})"),
                ClientEvent::SessionClosed => println!("(session closed)"),
                ClientEvent::ViewChanged(_) => {}
            }
        }
    });
}

async fn print_prompt(view: View, client: &AdminClient) {
    match view {
        View::Terminal => print!("terminal> "),
        View::DiskSelector => print!("disks> "),
        View::PartitionSelector => print!("partitions> "),
        View::FileSystemBrowser => {
            let path = client.snapshot().await.current_path;
            print!("fs {path}> ");
        }
    }
    use std::io::Write;
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!("  login <u> <p> <id>   authenticate");
    println!("  logout               close the session and return to terminal");
    println!("  cmd <text>           execute a raw command");
    println!("  load <file.smia>     load a script into the command buffer");
    println!("  run                  execute the command buffer");
    println!("  disks                browse disks (requires session)");
    println!("  select <n>           choose disk/partition number");
    println!("  open <name>          enter folder or preview file");
    println!("  up / back / terminal navigation");
    println!("  cat <path>           read a file by absolute path");
    println!("  show                 print current state");
    println!("  quit");
}

fn print_disks(disks: &[DiskDescriptor]) {
    for (i, disk) in disks.iter().enumerate() {
        println!(
            "  [{i}] {} ({}, fit {:?}, mounted: {})",
            disk.path,
            disk.capacity,
            disk.fit,
            disk.mounted.join(", ")
        );
    }
}

fn print_partitions(partitions: &[PartitionDescriptor]) {
    for (i, partition) in partitions.iter().enumerate() {
        println!(
            "  [{i}] {} ({}) {} fit {:?} {:?}",
            partition.name, partition.id, partition.size, partition.fit, partition.status
        );
    }
}

fn print_entries(entries: &[DirectoryEntry]) {
    for entry in entries {
        println!("  {:?}\t{}\t{}", entry.kind, entry.permissions, entry.name);
    }
}

async fn print_snapshot(client: &AdminClient) {
    let snapshot = client.snapshot().await;
    println!("view: {:?}", snapshot.view);
    match &snapshot.session {
        Some(session) => println!("session: {} @ {}", session.username, session.partition_id),
        None => println!("session: none"),
    }
    if let Some(disk) = &snapshot.selected_disk {
        println!("disk: {}", disk.path);
    }
    if !snapshot.current_partition_id.is_empty() {
        println!("partition: {}", snapshot.current_partition_id);
    }
    println!("path: {}", snapshot.current_path);
    if !snapshot.transcript.is_empty() {
        println!("last transcript:\n{}", snapshot.transcript);
    }
}
