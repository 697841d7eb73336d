//! Dialweave command-line client
//!
//! Talks to the dial-plan backend configured through `DIALWEAVE_*` environment
//! variables (or the matching flags) and prints JSON on stdout. Logs go to
//! stderr and follow `RUST_LOG`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dialweave::{
    api::{DialplanApi, HttpDialplanApi},
    config::Config,
    dialplan::Id,
    editor::{EditorSession, TracingNotifier},
    journey::{action_type_params_for_tag, delay_type_params_for_tag},
};
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dialweave", version, about = "Dial-plan builder client")]
struct Cli {
    /// Backend base URL (e.g., "https://pbx.example.com/api")
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token
    #[arg(long, global = true)]
    token: Option<String>,

    /// Tenant id sent in the tenant header
    #[arg(long, global = true)]
    tenant: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List dial-plan projects
    Projects,
    /// Show a project with its contexts, nodes and connections
    Show { project: String },
    /// Validate a project on the backend
    Validate { project: String },
    /// Generate the dial plan; prints it or writes `<slug>.conf`
    Generate {
        project: String,
        /// Directory to write the `.conf` file into
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write into the configured export directory (DIALWEAVE_EXPORT_DIR)
        #[arg(long, conflicts_with = "out")]
        save: bool,
    },
    /// Deploy a project to the PBX
    Deploy { project: String },
    /// Clone a project under a new name
    Clone { project: String, name: String },
    /// List the node type catalog
    NodeTypes,
    /// Parameter definitions of a journey action type
    ActionParams { tag: String },
    /// Parameter definitions of a journey delay type
    DelayParams { tag: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContextView<'a> {
    context: &'a dialweave::dialplan::DialplanContext,
    nodes: Vec<&'a dialweave::dialplan::DialplanNode>,
    connections: Vec<&'a dialweave::dialplan::DialplanConnection>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration from env, then apply flag overrides
    let mut config = Config::default();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(token) = cli.token {
        config.api.token = Some(token);
    }
    if let Some(tenant) = cli.tenant {
        config.api.tenant_id = Some(tenant);
    }

    // Schema lookups need no backend
    match &cli.command {
        Command::ActionParams { tag } => return print_json(&action_type_params_for_tag(tag)?),
        Command::DelayParams { tag } => return print_json(&delay_type_params_for_tag(tag)?),
        _ => {}
    }

    let api = Arc::new(
        HttpDialplanApi::new(&config.api).context("Failed to build backend client")?,
    );
    tracing::info!("Using dial-plan backend at {}", api.base_url());

    match cli.command {
        Command::Projects => print_json(&api.get_projects().await?),
        Command::NodeTypes => print_json(&api.get_node_types().await?),
        Command::Show { project } => {
            let mut session = EditorSession::open(api, Arc::new(TracingNotifier)).await;
            session.load_project(&Id::from(project)).await?;

            let ids: Vec<Id> = session.contexts().iter().map(|c| c.id.clone()).collect();
            for id in &ids {
                session.select_context(id).await?;
            }
            let contexts: Vec<ContextView> = ids
                .iter()
                .filter_map(|id| session.graph(id))
                .map(|graph| ContextView {
                    context: graph.context(),
                    nodes: graph.nodes().collect(),
                    connections: graph.connections().collect(),
                })
                .collect();

            print_json(&serde_json::json!({
                "project": session.project(),
                "contexts": contexts,
            }))
        }
        Command::Validate { project } => {
            let result = api.validate_project(&Id::from(project)).await?;
            print_json(&result)?;
            if !result.valid {
                std::process::exit(2);
            }
            Ok(())
        }
        Command::Generate { project, out, save } => {
            let mut session = EditorSession::open(api, Arc::new(TracingNotifier)).await;
            session.load_project(&Id::from(project)).await?;
            let out = out.or_else(|| save.then(|| PathBuf::from(&config.editor.export_dir)));
            match out {
                Some(dir) => {
                    let path = session.export_dialplan(&dir).await?;
                    print_json(&serde_json::json!({ "path": path }))
                }
                None => {
                    let dialplan = session.generate().await?;
                    print!("{}", dialplan.content);
                    Ok(())
                }
            }
        }
        Command::Deploy { project } => {
            let mut session = EditorSession::open(api, Arc::new(TracingNotifier)).await;
            session.load_project(&Id::from(project)).await?;
            print_json(&session.deploy().await?)
        }
        Command::Clone { project, name } => {
            if name.trim().is_empty() {
                bail!("Clone name must not be empty");
            }
            let mut session = EditorSession::open(api, Arc::new(TracingNotifier)).await;
            session.load_project(&Id::from(project)).await?;
            print_json(&session.clone_project(&name).await?)
        }
        Command::ActionParams { .. } | Command::DelayParams { .. } => Ok(()),
    }
}
