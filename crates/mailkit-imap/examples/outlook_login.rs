#![allow(clippy::expect_used, clippy::doc_markdown, clippy::uninlined_format_args)]
//! Example: connect, authenticate, and list folders against any IMAP server.
//!
//! ## Running
//!
//! ```bash
//! cargo run --package mailkit-imap --example outlook_login
//! ```

use mailkit_imap::Client;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    print!("IMAP host: ");
    io::stdout().flush()?;
    let mut host = String::new();
    io::stdin().read_line(&mut host)?;
    let host = host.trim();

    print!("Username: ");
    io::stdout().flush()?;
    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    let username = username.trim();

    print!("Password: ");
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    let password = password.trim();

    println!("\nConnecting to {host}:993...");
    let stream = mailkit_imap::connection::connect_tls(host, 993).await?;
    println!("connected");

    println!("Authenticating as {username}...");
    let client = Client::from_stream(stream).await?;
    let mut client = client.login(username, password).await?;
    println!("authenticated\n");

    println!("Listing folders:");
    let folders = client.list("", "*").await?;
    for folder in folders {
        println!("  - {}", folder.mailbox);
    }

    println!("\nDisconnecting...");
    client.logout().await?;
    println!("disconnected");

    Ok(())
}
