//! Database bootstrap commands.

use std::io::{BufRead, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::{
    db,
    models::DEMO_MOVIES,
    store::{AdminOutcome, Store},
};

/// A personal movie watchlist.
#[derive(Parser)]
#[command(name = "watchlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web server (default)
    Serve,

    /// Initialize the database.
    Initdb {
        /// Drop all tables before creating them again
        #[arg(long)]
        drop: bool,
    },

    /// Create the schema and fill it with demo movies.
    Forge,

    /// Create the admin account, or update it if one exists.
    Admin {
        /// The username used to login.
        #[arg(long)]
        username: Option<String>,
        /// The password used to login.
        #[arg(long)]
        password: Option<String>,
    },
}

pub async fn initdb(store: &Store, drop: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if drop {
        db::drop_schema(store.db()).await?;
    }
    db::create_schema(store.db()).await?;
    writeln!(out, "Initialized database")?;
    Ok(())
}

pub async fn forge(store: &Store, out: &mut impl Write) -> anyhow::Result<()> {
    db::create_schema(store.db()).await?;
    store.seed_movies(&DEMO_MOVIES).await?;
    tracing::info!(movies = store.count_movies().await?, "demo movies seeded");
    writeln!(out, "Done")?;
    Ok(())
}

pub async fn admin(
    store: &Store,
    username: &str,
    password: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    db::create_schema(store.db()).await?;

    let outcome = store.upsert_admin(username, password).await?;
    tracing::info!(username, ?outcome, "admin account saved");

    match outcome {
        AdminOutcome::Updated => writeln!(out, "Update admin...")?,
        AdminOutcome::Created => writeln!(out, "Create admin...")?,
    }

    writeln!(out, "Done")?;
    Ok(())
}

/// Ask for a value on `input` until a non-empty line arrives.
pub fn prompt(label: &str, input: &mut impl BufRead, out: &mut impl Write) -> anyhow::Result<String> {
    loop {
        write!(out, "{label}: ")?;
        out.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("failed to read from stdin")?;
        if read == 0 {
            anyhow::bail!("no value given for {label}");
        }

        let value = line.trim_end_matches(['\r', '\n']).to_string();
        if !value.is_empty() {
            return Ok(value);
        }
    }
}

/// Ask for a password twice on `input` until both entries agree.
pub fn prompt_password(input: &mut impl BufRead, out: &mut impl Write) -> anyhow::Result<String> {
    confirm_password(out, |label, out| prompt(label, &mut *input, out))
}

/// Like [`prompt_password`], but reads from the terminal without echoing.
pub fn prompt_hidden_password(out: &mut impl Write) -> anyhow::Result<String> {
    confirm_password(out, |label, _| loop {
        let value = rpassword::prompt_password(format!("{label}: "))
            .context("failed to read password")?;
        if !value.is_empty() {
            return Ok(value);
        }
    })
}

fn confirm_password<W: Write>(
    out: &mut W,
    mut ask: impl FnMut(&str, &mut W) -> anyhow::Result<String>,
) -> anyhow::Result<String> {
    loop {
        let first = ask("Password", out)?;
        let second = ask("Repeat for confirmation", out)?;
        if first == second {
            return Ok(first);
        }
        writeln!(out, "Error: The two entered values do not match.")?;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    async fn store() -> Store {
        Store::new(db::connect("sqlite::memory:").await.unwrap())
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn initdb_reports_and_is_repeatable() {
        let store = store().await;
        let mut out = Vec::new();

        initdb(&store, false, &mut out).await.unwrap();
        initdb(&store, false, &mut out).await.unwrap();

        assert_eq!(output(out).matches("Initialized database").count(), 2);
        assert_eq!(store.count_movies().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn initdb_drop_clears_existing_rows() {
        let store = store().await;
        forge(&store, &mut Vec::new()).await.unwrap();
        assert_eq!(store.count_movies().await.unwrap(), 10);

        initdb(&store, true, &mut Vec::new()).await.unwrap();
        assert_eq!(store.count_movies().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn forge_seeds_demo_movies() {
        let store = store().await;
        let mut out = Vec::new();

        forge(&store, &mut out).await.unwrap();

        assert!(output(out).contains("Done"));
        assert_ne!(store.count_movies().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn admin_creates_account_on_empty_database() {
        let store = store().await;
        let mut out = Vec::new();

        admin(&store, "test2", "123456", &mut out).await.unwrap();

        let out = output(out);
        assert!(out.contains("Create admin..."));
        assert!(out.contains("Done"));
        assert_eq!(store.count_users().await.unwrap(), 1);

        let user = store.first_user().await.unwrap().unwrap();
        assert_eq!(user.username, "test2");
        assert_eq!(user.name, "Admin");
        assert!(store.authenticate("test2", "123456").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn admin_updates_existing_account() {
        let store = store().await;
        admin(&store, "test1", "123456", &mut Vec::new()).await.unwrap();

        let mut out = Vec::new();
        admin(&store, "test3", "12345678", &mut out).await.unwrap();

        let out = output(out);
        assert!(out.contains("Update admin..."));
        assert!(out.contains("Done"));
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(store.first_user().await.unwrap().unwrap().username, "test3");
        assert!(store.authenticate("test3", "12345678").await.unwrap().is_some());
    }

    #[test]
    fn prompt_skips_blank_lines() {
        let mut input = Cursor::new("\n\ntest1\n");
        let mut out = Vec::new();

        let value = prompt("Username", &mut input, &mut out).unwrap();

        assert_eq!(value, "test1");
        assert_eq!(output(out).matches("Username: ").count(), 3);
    }

    #[test]
    fn prompt_fails_on_end_of_input() {
        let mut input = Cursor::new("");
        assert!(prompt("Username", &mut input, &mut Vec::new()).is_err());
    }

    #[test]
    fn password_prompt_repeats_until_confirmed() {
        let mut input = Cursor::new("123456\n654321\nsecret\nsecret\n");
        let mut out = Vec::new();

        let password = prompt_password(&mut input, &mut out).unwrap();

        assert_eq!(password, "secret");
        assert!(output(out).contains("Error: The two entered values do not match."));
    }
}
