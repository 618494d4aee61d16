use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "peerlink")]
#[command(version)]
#[command(about = "Console client for a peer-coordination and messaging relay")]
pub struct Args {
    /// Base URL of the relay service
    #[arg(long, default_value = "http://localhost:8001")]
    pub base_url: String,

    /// Peer-directory poll interval in milliseconds (watch mode)
    #[arg(long, default_value = "5000")]
    pub poll_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register this peer with the relay
    Register {
        #[arg(long)]
        peer_id: String,
        #[arg(long)]
        ip: String,
        #[arg(long)]
        port: u16,
    },
    /// Fetch the peer directory
    Peers,
    /// Join a named channel
    Join {
        #[arg(long)]
        peer_id: String,
        #[arg(long)]
        channel: String,
    },
    /// Request a peer-to-peer connection
    Connect {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Broadcast a message to a channel
    Broadcast {
        #[arg(long)]
        peer_id: String,
        #[arg(long)]
        channel: String,
        #[arg(long)]
        message: String,
    },
    /// Fetch channel history
    Messages {
        #[arg(long)]
        channel: String,
    },
    /// Send a direct message to one peer
    Dm {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        message: String,
    },
    /// Poll the peer directory and reprint it on every refresh
    Watch,
}
