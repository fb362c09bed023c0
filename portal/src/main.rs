use anyhow::{bail, Context, Result};
use clap::Parser;
use judge_portal::{
    client::PortalClient,
    config::PortalConfig,
    ingest::{DropFilter, FolderDrop, SubmitDraft},
    prelude::*,
    problem::{load_problem_titles, ProblemCatalog, ProblemStatus},
    profile::{ProfileEditor, ProfileField},
    verdict::{render, VerdictPoller},
};
use futures::Future;
use std::{
    collections::HashMap,
    process::exit,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing_subscriber::EnvFilter;

mod opt;

#[tokio::main]
async fn main() -> Result<()> {
    let opt = opt::Opts::parse();
    init_logging()?;

    let cancel = CancellationToken::new();
    install_ctrl_c(cancel.clone())?;

    let mut cfg = PortalConfig::load(opt.opt.config.as_deref())
        .await
        .context("Failed to load config")?;
    if let Some(host) = opt.opt.host {
        cfg.host = host;
    }

    match opt.cmd {
        opt::SubCmd::Ingest(cmd) => interruptible(ingest(cmd, &cfg), &cancel).await,
        opt::SubCmd::Verdict(cmd) => verdict(cmd, &cfg, cancel).await,
        opt::SubCmd::Status(cmd) => interruptible(status(cmd, &cfg), &cancel).await,
        opt::SubCmd::Profile(cmd) => interruptible(profile(cmd, &cfg), &cancel).await,
    }
}

async fn interruptible<F>(f: F, cancel: &CancellationToken) -> Result<()>
where
    F: Future<Output = Result<()>> + Send,
{
    match f.with_cancel(cancel.cancelled()).await {
        Some(res) => res,
        None => bail!("Interrupted"),
    }
}

fn init_logging() -> Result<()> {
    tracing_log::LogTracer::init().context("Failed to bridge log records")?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logger")
}

/// The first Ctrl-C asks running work to stop, the second one force quits.
fn install_ctrl_c(cancel: CancellationToken) -> Result<()> {
    let pressed = AtomicBool::new(false);
    ctrlc::set_handler(move || {
        if !pressed.swap(true, Ordering::SeqCst) {
            tracing::warn!("Stopping... Press Ctrl-C again to force quit.");
            cancel.cancel();
        } else {
            tracing::error!("Force quit!");
            exit(101);
        }
    })
    .context("Failed to set termination handler")
}

fn resolve_uid(uid: Option<String>, cfg: &PortalConfig) -> Result<String> {
    match uid.or_else(|| cfg.uid.clone()) {
        Some(uid) => Ok(uid),
        None => bail!("No user id given; pass --uid or set `uid` in the config file"),
    }
}

async fn ingest(cmd: opt::IngestSubCmd, cfg: &PortalConfig) -> Result<()> {
    let mut area = FolderDrop::new(DropFilter::new(&cfg.ingest));
    let mut draft = SubmitDraft::default();
    let set = area
        .drop_folder(&cmd.dir, &mut draft)
        .await
        .with_context(|| format!("Failed to ingest {}", cmd.dir.display()))?;

    if let Some(warning) = area.warning() {
        eprintln!("{}", warning);
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    let mark = |present: bool| if present { "yes" } else { "-" };
    println!("{:>4}  {:<24} {:<5} {:<5}", "slot", "name", "in", "out");
    for (slot, name) in set.names.iter().enumerate() {
        println!(
            "{:>4}  {:<24} {:<5} {:<5}",
            slot,
            name,
            mark(set.inputs[slot].is_some()),
            mark(set.outputs[slot].is_some())
        );
    }
    println!(
        "{} test case(s), {} complete",
        set.len(),
        draft.complete_cases()
    );
    let incomplete: Vec<_> = set
        .incomplete_slots()
        .map(|slot| set.names[slot].as_str())
        .collect();
    if !incomplete.is_empty() {
        println!("missing input or output: {}", incomplete.join(", "));
    }
    if !set.ignored.is_empty() {
        println!("ignored: {}", set.ignored.join(", "));
    }
    if !set.duplicates.is_empty() {
        println!("duplicates dropped: {}", set.duplicates.join(", "));
    }
    Ok(())
}

async fn verdict(
    cmd: opt::VerdictSubCmd,
    cfg: &PortalConfig,
    cancel: CancellationToken,
) -> Result<()> {
    let client = Arc::new(PortalClient::new(cfg).context("Failed to build HTTP client")?);
    let problems: Arc<dyn ProblemCatalog> = match &cmd.problems {
        Some(path) => Arc::new(
            load_problem_titles(path)
                .await
                .context("Failed to load problem titles")?,
        ),
        None => Arc::new(HashMap::<String, String>::new()),
    };

    let mut handle = VerdictPoller::new(client, problems, cmd.submission.as_str())
        .interval(cfg.poll_interval())
        .stop_on_settled(cmd.stop_on_final || cfg.stop_on_final_verdict)
        .activate();

    loop {
        println!("{}\n", render::render_state(&cmd.submission, &handle.state()));
        match handle.changed().with_cancel(cancel.cancelled()).await {
            Some(true) => continue,
            _ => break,
        }
    }
    handle.deactivate().await;
    Ok(())
}

async fn status(cmd: opt::StatusSubCmd, cfg: &PortalConfig) -> Result<()> {
    let uid = resolve_uid(cmd.uid, cfg)?;
    let client = PortalClient::new(cfg).context("Failed to build HTTP client")?;
    let res = client
        .get_submissions(&ProblemStatus::request(&cmd.problems, &uid))
        .await
        .context("Failed to fetch submissions")?;

    for (id, subs) in cmd.problems.iter().zip(res.submissions_per_problem.iter()) {
        let status = ProblemStatus::from_submissions(&subs.submissions, ProblemStatus::RECENT_LIMIT);
        println!(
            "{}: {}",
            id,
            if status.solved { "solved" } else { "unsolved" }
        );
        for s in &status.recent {
            let time = s
                .time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!("    {:<16} {}", time, s.verdict);
        }
    }
    Ok(())
}

fn print_profile(editor: &ProfileEditor) {
    for field in ProfileField::ALL {
        print!("{:<10} {}", field.label(), editor.saved().get(field));
        match editor.field_message(field) {
            Some(msg) => println!("  ({})", msg),
            None => println!(),
        }
    }
    let c = editor.counters();
    println!(
        "attempted {}, accepted {}, wrong {}, TLE {}, RTE {}",
        c.attempted, c.accepted, c.wrong, c.tle, c.rte
    );
}

async fn profile(cmd: opt::ProfileSubCmd, cfg: &PortalConfig) -> Result<()> {
    let client = PortalClient::new(cfg).context("Failed to build HTTP client")?;
    match cmd {
        opt::ProfileSubCmd::Show { uid } => {
            let uid = resolve_uid(uid, cfg)?;
            let data = client
                .get_user_data(&uid)
                .await
                .context("Failed to fetch profile")?;
            print_profile(&ProfileEditor::new(uid, &data));
        }
        opt::ProfileSubCmd::Edit(edit) => {
            let uid = resolve_uid(edit.uid, cfg)?;
            let data = client
                .get_user_data(&uid)
                .await
                .context("Failed to fetch profile")?;
            let mut editor = ProfileEditor::new(uid, &data);

            editor.toggle();
            let changes = [
                (ProfileField::Username, edit.username),
                (ProfileField::Email, edit.email),
                (ProfileField::Name, edit.name),
                (ProfileField::School, edit.school),
            ];
            for (field, value) in changes {
                if let Some(value) = value {
                    editor.set_field(field, value);
                }
            }

            let req = match editor.toggle() {
                Some(req) => req,
                None => {
                    println!("Nothing to update");
                    return Ok(());
                }
            };
            match client.update_user_data(&req).await {
                Ok(res) => {
                    let done = editor.apply_update(&res);
                    print_profile(&editor);
                    if !done {
                        bail!("Some fields were not updated");
                    }
                }
                Err(e) => {
                    editor.apply_update_failure(&e);
                    return Err(e).context("Failed to update profile");
                }
            }
        }
    }
    Ok(())
}
