//! Escalation tracker command line
//!
//! Lists, summarizes and edits escalations held in a local JSON store or
//! behind a REST backend.
//!
//! # Usage
//!
//! ```bash
//! # First run: save your profile
//! ESCALATIONS_USER=jane escalations profile --name "Jane Doe" --email jane@corp.example
//!
//! # Red escalations for Finance, oldest first
//! escalations list --status Red --group Finance --sort created --asc
//!
//! # Values to filter on, then delete without the prompt
//! escalations options
//! escalations delete 42 --yes
//!
//! # Against the REST backend
//! ESCALATIONS_URL=https://tracker.example/api escalations summary --json
//! ```

#![allow(clippy::uninlined_format_args)]

mod args;
mod render;

use anyhow::{bail, Context, Result};
use clap::Parser;
use escalation_tracker::{
    Bootstrap, CallerProfile, EscalationForm, EscalationId, EscalationRecord, HttpSource,
    Identity, JsonFileSource, Session, SharedSource, SourceConfig, TrackerConfig,
};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info};

use args::{confirmed, resolve_sort, Cli, Command, FieldArgs};

fn connect(config: &TrackerConfig) -> Result<SharedSource> {
    let source: SharedSource = match config.source() {
        SourceConfig::File(path) => {
            debug!(path = %path.display(), "Using JSON file store");
            Arc::new(JsonFileSource::open(path))
        }
        SourceConfig::Http(url) => {
            debug!(url = %url, "Using REST backend");
            Arc::new(
                HttpSource::new(url, config.timeout).context("Failed to build HTTP client")?,
            )
        }
    };
    Ok(source)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TrackerConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    let identity = match &config.user {
        Some(user) => Identity::authenticated(user.clone()),
        None => Identity::anonymous(),
    };
    let source = connect(&config)?;
    let mut session = Session::new(source, identity).with_sort(config.default_sort);

    if !session.identity().authenticated {
        bail!("Not signed in; set ESCALATIONS_USER or `user` in the config file");
    }
    let bootstrap = session.bootstrap().await.context("Failed to start session")?;
    info!(role = %session.role(), ?bootstrap, "Session ready");

    match cli.command {
        Command::Profile {
            name,
            email,
            group,
            area,
        } => {
            let profile = CallerProfile {
                display_name: name,
                email,
                default_business_group: group,
                default_functional_area: area,
            };
            session.complete_profile(profile).await?;
            println!("Profile saved");
            Ok(())
        }
        Command::Whoami => whoami(&session, cli.json),
        command => {
            if bootstrap == Bootstrap::NeedsProfile {
                bail!(
                    "No profile for {}; run `escalations profile --name .. --email ..` first",
                    session.identity().subject
                );
            }
            run(&mut session, command, cli.json).await
        }
    }
}

fn whoami(session: &Session, as_json: bool) -> Result<()> {
    if as_json {
        return print_json(&json!({
            "subject": session.identity().subject,
            "role": session.role(),
            "profile": session.profile(),
        }));
    }
    println!("{} ({})", session.identity().subject, session.role());
    match session.profile() {
        Some(profile) => println!("{} <{}>", profile.display_name, profile.email),
        None => println!("No profile saved; run `escalations profile`"),
    }
    Ok(())
}

async fn run(session: &mut Session, command: Command, as_json: bool) -> Result<()> {
    match command {
        Command::List {
            filter,
            sort,
            desc,
            asc,
        } => {
            session.refresh().await?;
            let key = resolve_sort(session.query().sort_key(), sort, desc, asc);
            session.query_mut().set_sort(key);
            session.query_mut().set_criteria(filter.criteria());

            let view = session.view();
            if as_json {
                print_json(&render::view_json(view))?;
            } else {
                print!("{}", render::table(view));
            }
        }
        Command::Summary { filter } => {
            session.refresh().await?;
            session.query_mut().set_criteria(filter.criteria());

            let summary = &session.view().summary;
            if as_json {
                print_json(&render::summary_json(summary))?;
            } else {
                print!("{}", render::summary_text(summary));
            }
        }
        Command::Show { id } => {
            let record = session.open(id).await?;
            if as_json {
                print_json(&serde_json::to_value(&record)?)?;
            } else {
                print!("{}", render::detail(&record, chrono::Utc::now()));
            }
        }
        Command::Create { fields } => {
            let mut form = session.new_draft();
            fields.apply(&mut form.fields);
            let id = session.create(&form).await?;
            report(as_json, "created", id)?;
        }
        Command::Edit { id, fields } => {
            let record = session.open(id).await?;
            let form = edit_form(&record, &fields);
            session.submit(&form).await?;
            report(as_json, "updated", id)?;
        }
        Command::Delete { id, yes } => {
            if !yes {
                let record = session.open(id).await?;
                if !confirm_delete(&record)? {
                    println!("Cancelled");
                    return Ok(());
                }
            }
            session.delete(id).await?;
            report(as_json, "deleted", id)?;
        }
        Command::Options => {
            session.refresh().await?;
            let options = session.query().options();
            if as_json {
                print_json(&serde_json::to_value(&options)?)?;
            } else {
                print!("{}", render::options_text(&options));
            }
        }
        Command::Profile { .. } | Command::Whoami => {}
    }
    Ok(())
}

fn confirm_delete(record: &EscalationRecord) -> Result<bool> {
    print!(
        "Delete {} \"{}\"? This cannot be undone [y/N] ",
        record.escalation_number, record.fields.title
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(confirmed(&answer))
}

fn edit_form(record: &EscalationRecord, fields: &FieldArgs) -> EscalationForm {
    let mut form = EscalationForm::edit(record);
    fields.apply(&mut form.fields);
    form
}

fn report(as_json: bool, action: &str, id: EscalationId) -> Result<()> {
    if as_json {
        print_json(&json!({ "id": id, "action": action }))
    } else {
        println!("Escalation {} {}", id, action);
        Ok(())
    }
}
