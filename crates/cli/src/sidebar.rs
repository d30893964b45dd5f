//! Settings prompts.

use anyhow::Result;
use database::Source;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use session::Sidebar;

/// Ask for the settings, pre-filled from `previous`.
///
/// Escaping the mode selector leaves no database selected.
pub fn prompt(previous: &Sidebar) -> Result<Sidebar> {
    let theme = ColorfulTheme::default();
    let default = previous
        .source
        .and_then(|source| Source::ALL.iter().position(|s| *s == source))
        .unwrap_or(0);

    let selected = Select::with_theme(&theme)
        .with_prompt("Choose the DB which you want to chat with")
        .items(&Source::ALL.map(Source::label))
        .default(default)
        .interact_opt()?;

    let mut sidebar = Sidebar {
        source: selected.map(|index| Source::ALL[index]),
        ..Default::default()
    };

    if sidebar.source == Some(Source::Remote) {
        sidebar.host = text(&theme, "Provide Host Name", &previous.host)?;
        sidebar.user = text(&theme, "MySQL Username", &previous.user)?;
        sidebar.password = secret(&theme, "Provide the Password")?;
        sidebar.database = text(&theme, "MySQL Database Name", &previous.database)?;
    }

    sidebar.api_key = if previous.has_api_key() && keep(&theme, "Keep the Groq API Key")? {
        previous.api_key.clone()
    } else {
        secret(&theme, "Groq API Key")?
    };
    Ok(sidebar)
}

/// Ask whether to open the settings again.
pub fn reopen() -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Open the settings again?")
        .default(true)
        .interact()?)
}

fn text(theme: &ColorfulTheme, prompt: &str, initial: &str) -> Result<String> {
    Ok(Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?)
}

fn secret(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    Ok(Password::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?)
}

fn keep(theme: &ColorfulTheme, prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(true)
        .interact()?)
}
