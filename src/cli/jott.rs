//! Jott CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use super::output::Output;
use crate::domain::{Jott, JottId, JottPatch, Profile, Publication, Tier, UserId, Visibility};
use crate::service::{CoreError, JottService, ViewAccounting};
use crate::storage::{FileJottStore, FileProfileStore, FileQuotaLedger, Workspace};

type FileService = JottService<FileJottStore, FileProfileStore, FileQuotaLedger>;

fn service(workspace: &Workspace) -> FileService {
    JottService::new(
        workspace.jott_store(),
        workspace.profile_store(),
        workspace.quota_ledger(),
    )
}

/// Resolves the acting user: the --actor flag (or JOTT_ACTOR) wins, then the
/// workspace config, then the global config
fn resolve_actor(workspace: &Workspace, flag: Option<&str>) -> Result<UserId> {
    resolve_actor_opt(workspace, flag)?.ok_or_else(|| CoreError::Unauthenticated.into())
}

/// Like [`resolve_actor`] for commands that work anonymously: no configured
/// identity yields `None`, but a malformed --actor is still an error
fn resolve_actor_opt(workspace: &Workspace, flag: Option<&str>) -> Result<Option<UserId>> {
    match flag {
        Some(raw) => {
            let actor = raw
                .parse()
                .with_context(|| format!("Invalid actor ID '{}'", raw))?;
            Ok(Some(actor))
        }
        None => Ok(workspace.config().actor().cloned()),
    }
}

fn parse_jott_id(raw: &str) -> Result<JottId> {
    raw.parse().with_context(|| format!("Invalid jott ID '{}'", raw))
}

fn parse_visibility(raw: &str) -> Result<Visibility> {
    match raw.to_ascii_lowercase().as_str() {
        "public" => Ok(Visibility::Public),
        "private" => Ok(Visibility::Private),
        other => anyhow::bail!("Invalid visibility '{}': expected public or private", other),
    }
}

fn read_content_arg(
    content: Option<String>,
    content_file: Option<PathBuf>,
) -> Result<Option<String>> {
    match (content, content_file) {
        (Some(raw), _) => Ok(Some(raw)),
        (None, Some(path)) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read content file: {}", path.display()))?;
            Ok(Some(raw))
        }
        (None, None) => Ok(None),
    }
}

pub fn init(output: &Output, path: &str, handle: &str) -> Result<()> {
    let workspace = Workspace::init(path, handle)?;

    let actor = workspace
        .config()
        .actor()
        .cloned()
        .ok_or(CoreError::Unauthenticated)?;

    output.success(&format!(
        "Initialized jframe workspace at {} (signed in as {})",
        workspace.root().display(),
        actor
    ));
    Ok(())
}

pub fn create(
    output: &Output,
    actor_flag: Option<&str>,
    title: &str,
    description: Option<String>,
    content: Option<String>,
    content_file: Option<PathBuf>,
) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let actor = resolve_actor(&workspace, actor_flag)?;
    let raw = read_content_arg(content, content_file)?.unwrap_or_else(|| "{}".to_string());

    output.verbose(&format!("creating jott as {}", actor));
    let jott = service(&workspace).create(&actor, title, description, &raw)?;

    if output.is_json() {
        output.data(&jott);
    } else {
        output.success(&format!("Created jott {} \"{}\"", jott.id, jott.title));
    }
    Ok(())
}

#[derive(Serialize)]
struct Dashboard {
    jotts: Vec<Jott>,
    total: usize,
    published: usize,
    total_views: u64,
    quota_used: u32,
    quota_limit: u32,
}

pub fn list(output: &Output, actor_flag: Option<&str>) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let actor = resolve_actor(&workspace, actor_flag)?;
    let svc = service(&workspace);

    let jotts = svc.list_owned(&actor)?;
    let usage = svc.quota_usage(&actor)?;

    let dashboard = Dashboard {
        total: jotts.len(),
        published: jotts.iter().filter(|j| j.is_published()).count(),
        total_views: jotts.iter().map(|j| j.view_count).sum(),
        quota_used: usage.used,
        quota_limit: usage.limit,
        jotts,
    };

    if output.is_json() {
        output.data(&dashboard);
        return Ok(());
    }

    if dashboard.jotts.is_empty() {
        output.success("No jotts yet. Create your first with 'jott create <title>'.");
        return Ok(());
    }

    output.row(&["ID", "STATE", "VIS", "VIEWS", "CREATED", "TITLE"]);
    for jott in &dashboard.jotts {
        output.row(&[
            &jott.id.to_string(),
            jott.publication.label(),
            jott.visibility.label(),
            &jott.view_count.to_string(),
            &jott.created_at.format("%Y-%m-%d").to_string(),
            &jott.title,
        ]);
    }
    output.blank();
    output.success(&format!(
        "{} jotts, {} published, {} total views. {}/{} created this month.",
        dashboard.total,
        dashboard.published,
        dashboard.total_views,
        dashboard.quota_used,
        dashboard.quota_limit
    ));
    Ok(())
}

pub fn show(output: &Output, actor_flag: Option<&str>, id: &str) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let id = parse_jott_id(id)?;

    // Reads work without an identity; private jotts then stay hidden
    let actor = resolve_actor_opt(&workspace, actor_flag)?;
    let jott = service(&workspace).get(actor.as_ref(), &id)?;

    if output.is_json() {
        output.data(&jott);
        return Ok(());
    }

    output.row(&["ID:", &jott.id.to_string()]);
    output.row(&["Title:", &jott.title]);
    if let Some(description) = &jott.description {
        output.row(&["Description:", description]);
    }
    output.row(&["Owner:", &jott.owner.to_string()]);
    output.row(&["State:", jott.publication.label()]);
    output.row(&["Visibility:", jott.visibility.label()]);
    output.row(&["Views:", &jott.view_count.to_string()]);
    output.row(&["Created:", &jott.created_at.to_rfc3339()]);
    output.row(&["Updated:", &jott.updated_at.to_rfc3339()]);
    output.blank();
    output.success(&jott.content.to_json_pretty());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn edit(
    output: &Output,
    actor_flag: Option<&str>,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    content_file: Option<PathBuf>,
    visibility: Option<String>,
) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let actor = resolve_actor(&workspace, actor_flag)?;
    let id = parse_jott_id(id)?;

    let patch = JottPatch {
        title,
        description,
        content: read_content_arg(content, content_file)?,
        publication: None,
        visibility: visibility.as_deref().map(parse_visibility).transpose()?,
    };

    if patch.is_empty() {
        anyhow::bail!("Nothing to change: pass at least one of --title, --description, --content, --visibility");
    }

    let jott = service(&workspace).update(&actor, &id, patch)?;

    if output.is_json() {
        output.data(&jott);
    } else {
        output.success(&format!("Updated jott {}", jott.id));
    }
    Ok(())
}

pub fn publish(output: &Output, actor_flag: Option<&str>, id: &str, publish: bool) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let actor = resolve_actor(&workspace, actor_flag)?;
    let id = parse_jott_id(id)?;

    let patch = JottPatch {
        publication: Some(if publish {
            Publication::Published
        } else {
            Publication::Draft
        }),
        ..Default::default()
    };
    let jott = service(&workspace).update(&actor, &id, patch)?;

    if output.is_json() {
        output.data(&jott);
    } else if publish {
        output.success(&format!("Published jott {}", jott.id));
    } else {
        output.success(&format!("Reverted jott {} to draft", jott.id));
    }
    Ok(())
}

pub fn delete(output: &Output, actor_flag: Option<&str>, id: &str) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let actor = resolve_actor(&workspace, actor_flag)?;
    let id = parse_jott_id(id)?;

    service(&workspace).delete(&actor, &id)?;

    output.success(&format!("Deleted jott {}", id));
    Ok(())
}

pub fn view(output: &Output, id: &str) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let id = parse_jott_id(id)?;

    // View accounting is open to anyone; no actor is resolved
    let views = ViewAccounting::new(workspace.jott_store());
    let count = views.record_view(&id)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "id": id.to_string(), "view_count": count }));
    } else {
        output.success(&format!("Jott {} has {} views", id, count));
    }
    Ok(())
}

pub fn quota(output: &Output, actor_flag: Option<&str>) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let actor = resolve_actor(&workspace, actor_flag)?;

    let usage = service(&workspace).quota_usage(&actor)?;

    if output.is_json() {
        output.data(&usage);
    } else {
        output.success(&format!(
            "{}/{} jotts created this month ({} remaining)",
            usage.used,
            usage.limit,
            usage.remaining()
        ));
    }
    Ok(())
}

pub fn profile(
    output: &Output,
    actor_flag: Option<&str>,
    tier: Option<String>,
    limit: Option<u32>,
) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let actor = resolve_actor(&workspace, actor_flag)?;
    let svc = service(&workspace);

    if tier.is_some() || limit.is_some() {
        let current = svc.profile(&actor)?;
        let updated = Profile {
            tier: tier
                .as_deref()
                .map(|t| t.parse::<Tier>().map_err(anyhow::Error::msg))
                .transpose()?
                .unwrap_or(current.tier),
            monthly_limit: limit.unwrap_or(current.monthly_limit),
        };
        svc.set_profile(&actor, &updated)?;
    }

    let profile = svc.profile(&actor)?;
    if output.is_json() {
        output.data(&profile);
    } else {
        output.success(&format!(
            "Tier: {} ({} jotts per month)",
            profile.tier, profile.monthly_limit
        ));
    }
    Ok(())
}

pub fn whoami(output: &Output, actor_flag: Option<&str>) -> Result<()> {
    let workspace = Workspace::open_current()?;
    let actor = resolve_actor(&workspace, actor_flag)?;
    let handle = workspace.config().workspace.handle.clone();

    if output.is_json() {
        output.data(&serde_json::json!({
            "actor": actor.to_string(),
            "handle": handle,
        }));
    } else if let Some(handle) = handle {
        output.success(&format!("{} ({})", actor, handle));
    } else {
        output.success(&actor.to_string());
    }
    Ok(())
}
