//! One-shot "say" command: send a single question and stream the answer to
//! stdout without entering the interactive loop.

use std::error::Error;
use std::io::{self, Write};

use crate::core::catalog::GENERAL_CATEGORY_ID;
use crate::core::chat_stream::{ChatStreamService, StreamMessage};
use crate::core::constants::CONNECTION_ERROR_TEXT;
use crate::core::conversation::ConversationManager;

pub async fn run_say(
    backend_url: String,
    category: Option<String>,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: sahayak say <question>");
        std::process::exit(1);
    }

    let (streams, mut rx) = ChatStreamService::new();
    let mut manager = ConversationManager::new(reqwest::Client::new(), backend_url, streams);
    manager.switch_category(category.as_deref().unwrap_or(GENERAL_CATEGORY_ID))?;

    let Some(stream_id) = manager.send_message(&prompt) else {
        eprintln!("Usage: sahayak say <question>");
        std::process::exit(1);
    };

    while let Some((message, id)) = rx.recv().await {
        let for_this_request = id == stream_id;
        if for_this_request {
            if let StreamMessage::Chunk(content) = &message {
                print!("{content}");
                io::stdout().flush()?;
            }
        }
        let failed = for_this_request && matches!(message, StreamMessage::Error(_));
        let finished = for_this_request && matches!(message, StreamMessage::End);

        manager.handle_stream_message(message, id);

        if failed {
            eprintln!();
            eprintln!("{CONNECTION_ERROR_TEXT}");
            std::process::exit(1);
        }
        if finished {
            println!();
            break;
        }
    }

    Ok(())
}
