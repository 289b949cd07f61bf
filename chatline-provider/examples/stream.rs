//! Stream one reply from the proxy and print it as it arrives.
//!
//! Set MONICA_API_KEY and MONICA_CLIENT_ID in your environment and run:
//!   cargo run -p chatline-provider --example stream

use std::io::Write;

use chatline_provider::ProxyClient;
use chatline_types::{ChatMessage, ChatRequest, Provider, StreamEvent};
use futures::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("MONICA_API_KEY")?;
    let client_id = std::env::var("MONICA_CLIENT_ID")?;

    let provider = ProxyClient::new(api_key).client_id(client_id);
    let request = ChatRequest::new(vec![ChatMessage::user("Say hello in one sentence.")]);

    let mut handle = provider.complete_stream(request).await?;
    let mut stdout = std::io::stdout();
    while let Some(event) = handle.receiver.next().await {
        match event {
            StreamEvent::Fragment(fragment) => {
                write!(stdout, "{}", fragment.delta)?;
                stdout.flush()?;
            }
            StreamEvent::Error(message) => eprintln!("\nstream error: {message}"),
            StreamEvent::Complete(assembled) => {
                println!();
                if assembled.terminated_early() {
                    eprintln!("(stream ended without [DONE])");
                }
            }
        }
    }

    Ok(())
}
