//! Writing generated dial plans to disk as `.conf` files

use crate::dialplan::types::{DialplanProject, GeneratedDialplan};
use std::path::{Path, PathBuf};

/// File name for a project's generated dial plan (e.g., "main-ivr.conf")
pub fn conf_file_name(project: &DialplanProject) -> String {
    format!("{}.conf", project.slug())
}

/// Write `dialplan` into `dir`, creating the directory if needed
pub async fn write_conf(
    dir: &Path,
    project: &DialplanProject,
    dialplan: &GeneratedDialplan,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(conf_file_name(project));
    let mut content = dialplan.content.clone();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    tokio::fs::write(&path, content).await?;

    tracing::info!("💾 Wrote dial plan for '{}' to {}", project.name, path.display());

    Ok(path)
}
