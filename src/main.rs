use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::*;

use peerlink::cli::{Args, Command};
use peerlink::client::RelayClient;
use peerlink::normalize::NormalizedResult;
use peerlink::scheduler::PeerListPoller;
use peerlink::sink::{RegionView, SinkId};
use peerlink::transport::RelayConfig;
use peerlink::wire::{
    BroadcastRequest, ConnectRequest, DirectMessageRequest, JoinChannelRequest, MessageQuery,
    RegisterRequest,
};

// ---------------------------------------------------------------------------
// Console rendering
// ---------------------------------------------------------------------------

fn print_result(result: &NormalizedResult) {
    let pretty = result.to_pretty();
    if result.is_error() {
        eprintln!("{}", pretty.bright_red());
    } else {
        println!("{}", pretty.bright_green());
    }
}

fn print_lines(header: &str, view: &RegionView) {
    let Some(lines) = &view.lines else { return };
    println!("{}", header.bright_cyan());
    for line in lines {
        println!("  {}", line);
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = RelayConfig::new(args.base_url.clone());
    config.poll_interval = Duration::from_millis(args.poll_ms);
    let client = Arc::new(RelayClient::new(config));

    match args.command {
        Command::Register { peer_id, ip, port } => {
            let request = RegisterRequest::new(peer_id, ip, port)?;
            print_result(&client.register_peer(&request).await);
        }
        Command::Peers => {
            print_result(&client.get_peer_list().await);
            print_lines("Active peers:", &client.sinks().view(SinkId::Register));
        }
        Command::Join { peer_id, channel } => {
            let request = JoinChannelRequest::new(peer_id, channel)?;
            print_result(&client.join_channel(&request).await);
        }
        Command::Connect { from, to } => {
            let request = ConnectRequest::new(from, to)?;
            print_result(&client.connect_peer(&request).await);
        }
        Command::Broadcast {
            peer_id,
            channel,
            message,
        } => {
            let request = BroadcastRequest::new(peer_id, channel, message)?;
            print_result(&client.broadcast_message(&request).await);
        }
        Command::Messages { channel } => {
            let query = MessageQuery::new(channel)?;
            print_result(&client.get_messages(&query).await);
            print_lines("Messages:", &client.sinks().view(SinkId::Broadcast));
        }
        Command::Dm { from, to, message } => {
            let request = DirectMessageRequest::new(from, to, message)?;
            print_result(&client.send_direct_message(&request).await);
        }
        Command::Watch => {
            // Seed the directory so the poll gate opens; until something has
            // rendered, ticks are no-ops.
            print_result(&client.get_peer_list().await);
            print_lines("Active peers:", &client.sinks().view(SinkId::Register));

            let handle = PeerListPoller::new(Arc::clone(&client)).spawn();
            eprintln!("{}", "  Watching peer directory. Press Ctrl+C to stop.".bright_blue());

            let interval = client.config().poll_interval;
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tokio::time::sleep(interval) => {
                        print_lines("Active peers:", &client.sinks().view(SinkId::Register));
                    }
                }
            }
            handle.abort();
        }
    }

    Ok(())
}
