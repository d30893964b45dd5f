//! sqlchat binary entry point.

use anyhow::Result;
use clap::Parser;
use sqlchat::{App, ChatRepl, Command, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    app.init_tracing();

    match app.command.unwrap_or(Command::Chat) {
        Command::Chat => ChatRepl::new(&Config::load()?)?.run().await?,
        Command::Generate => {
            let path = Config::default().save()?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
