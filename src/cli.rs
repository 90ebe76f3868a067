use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "feedpub")]
#[command(about = "Turn RSS feeds into EPUB books", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
    /// Convert a single feed and write the book to disk
    Build(BuildArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to (defaults to server.bind_addr)
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Feed URL; feed:// is accepted as http://
    #[arg(long)]
    pub url: String,

    /// Output file, `<title>.epub` in the current directory when omitted
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}
