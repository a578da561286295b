//! Interactive chat loop.
//!
//! A line-based driver around the conversation manager: one task reads user
//! input and one channel delivers transport events, multiplexed with
//! `tokio::select!`. Answers for the active category are printed as they
//! stream; a request left behind by a category switch keeps filling its own
//! section silently in the background.

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::catalog::{self, GENERAL_CATEGORY_ID};
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::core::constants::CONNECTION_ERROR_TEXT;
use crate::core::conversation::ConversationManager;
use crate::core::message::Message;
use crate::utils::logging::TranscriptLog;

pub async fn run_chat(
    backend_url: String,
    category: Option<String>,
    log: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let (streams, mut rx) = ChatStreamService::new();
    let mut manager = ConversationManager::new(reqwest::Client::new(), backend_url, streams);

    let start = category.as_deref().unwrap_or(GENERAL_CATEGORY_ID);
    manager.switch_category(start)?;

    let mut transcript = TranscriptLog::new();
    if let Some(path) = log {
        println!("{}", transcript.enable(path)?);
    }

    println!("Welcome! Type /help for commands.");
    print_history(manager.messages(start));
    prompt(manager.active_category())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = line.trim();
                if input.is_empty() {
                    prompt(manager.active_category())?;
                    continue;
                }
                if input.starts_with('/') {
                    if !handle_command(&mut manager, &mut transcript, input)? {
                        break;
                    }
                    prompt(manager.active_category())?;
                    continue;
                }

                if manager.send_message(input).is_some() {
                    transcript.record(&format!("You: {input}"))?;
                    // Prompt again once the answer finishes streaming.
                } else {
                    println!("(still waiting for the previous answer)");
                    prompt(manager.active_category())?;
                }
            }
            event = rx.recv() => {
                let Some((message, stream_id)) = event else {
                    break;
                };
                let for_active = manager.category_for_stream(stream_id)
                    == Some(manager.active_category());
                let category = manager
                    .category_for_stream(stream_id)
                    .map(str::to_string);
                let terminal = matches!(
                    message,
                    StreamMessage::End | StreamMessage::Error(_)
                );

                if for_active {
                    match &message {
                        StreamMessage::Chunk(content) => {
                            print!("{content}");
                            io::stdout().flush()?;
                        }
                        StreamMessage::End => println!(),
                        StreamMessage::Error(_) => {
                            println!();
                            println!("{CONNECTION_ERROR_TEXT}");
                        }
                    }
                }

                manager.handle_stream_message(message, stream_id);

                if terminal {
                    if let Some(category) = category {
                        if let Some(answer) = manager.messages(&category).last() {
                            transcript.record(&answer.content)?;
                        }
                    }
                    if for_active {
                        prompt(manager.active_category())?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Returns false when the session should end.
fn handle_command(
    manager: &mut ConversationManager,
    transcript: &mut TranscriptLog,
    input: &str,
) -> Result<bool, Box<dyn Error>> {
    let (command, argument) = match input.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (input, ""),
    };

    match command {
        "/quit" | "/exit" => return Ok(false),
        "/help" => print_help(),
        "/categories" => {
            for category in catalog::catalog() {
                println!("  {:<22} {}", category.id, category.description);
            }
        }
        "/category" => {
            if argument.is_empty() {
                println!("Usage: /category <id>   (see /categories)");
            } else {
                match manager.switch_category(argument) {
                    Ok(()) => print_history(manager.messages(argument)),
                    Err(e) => println!("{e}"),
                }
            }
        }
        "/log" => {
            if argument.is_empty() {
                println!("Transcript logging: {}", transcript.status());
            } else {
                match transcript.enable(argument) {
                    Ok(confirmation) => println!("{confirmation}"),
                    Err(e) => println!("Could not enable logging: {e}"),
                }
            }
        }
        _ => println!("Unknown command: {command} (try /help)"),
    }
    Ok(true)
}

fn print_help() {
    println!("  /category <id>   Switch to a help category");
    println!("  /categories      List the available categories");
    println!("  /log <file>      Enable transcript logging to a file");
    println!("  /quit            Leave the session");
}

fn print_history(messages: &[Message]) {
    for message in messages {
        if message.author.is_user() {
            println!("You: {}", message.content);
        } else {
            println!("{}", message.content);
        }
    }
}

fn prompt(category: &str) -> io::Result<()> {
    print!("[{category}] > ");
    io::stdout().flush()
}
