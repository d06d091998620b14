//! Artifact persistence and report assembly.
//!
//! Chart data is written as one pretty-printed JSON file per artifact; the
//! report is a single HTML index over whatever artifacts the run actually
//! produced. Rendering the chart data into images is left to downstream
//! consumers, the report only hands them every required input.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

/// One produced artifact, as listed in the report.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// Chart family, e.g. `trend` or `cluster`.
    pub kind: String,
    pub title: String,
    /// File name inside the output directory.
    pub file: String,
}

/// Serialize one chart-data artifact into the output directory.
pub fn write_artifact<T: Serialize>(
    dir: &Path,
    kind: &str,
    title: &str,
    face_id: Option<u32>,
    data: &T,
) -> anyhow::Result<Artifact> {
    let file = match face_id {
        Some(id) => format!("{}_face{}.json", kind, id),
        None => format!("{}.json", kind),
    };
    let path = dir.join(&file);
    let json = serde_json::to_vec_pretty(data)
        .with_context(|| format!("serializing {} artifact", kind))?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

    info!(kind, file = %file, "wrote chart artifact");
    Ok(Artifact {
        kind: kind.to_string(),
        title: title.to_string(),
        file,
    })
}

/// Summary figures shown at the top of the report.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub video: String,
    pub rows: usize,
    pub faces: usize,
    pub frames_sampled: u64,
    pub frames_failed: u64,
    pub csv_file: String,
}

/// Assemble the composite HTML report and return its path.
pub fn write_report(
    dir: &Path,
    summary: &RunSummary,
    artifacts: &[Artifact],
) -> anyhow::Result<PathBuf> {
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html><head><meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>Emotion analysis - {}</title>", summary.video);
    let _ = writeln!(
        html,
        "<style>body{{font-family:sans-serif;margin:2em}}table{{border-collapse:collapse}}td,th{{border:1px solid #ccc;padding:4px 10px}}</style>"
    );
    let _ = writeln!(html, "</head><body>");
    let _ = writeln!(html, "<h1>Emotion analysis report</h1>");
    let _ = writeln!(
        html,
        "<p>Video: <code>{}</code><br>Generated: {}</p>",
        summary.video,
        Utc::now().to_rfc3339()
    );
    let _ = writeln!(html, "<table>");
    let _ = writeln!(
        html,
        "<tr><th>Rows</th><th>Faces</th><th>Frames sampled</th><th>Frames failed</th></tr>"
    );
    let _ = writeln!(
        html,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        summary.rows, summary.faces, summary.frames_sampled, summary.frames_failed
    );
    let _ = writeln!(html, "</table>");
    let _ = writeln!(
        html,
        "<p>Emotion table: <a href=\"{0}\">{0}</a></p>",
        summary.csv_file
    );

    let _ = writeln!(html, "<h2>Chart artifacts</h2>");
    if artifacts.is_empty() {
        let _ = writeln!(html, "<p>No chart artifacts were produced.</p>");
    } else {
        let _ = writeln!(html, "<ul>");
        for artifact in artifacts {
            let _ = writeln!(
                html,
                "<li>{}: <a href=\"{1}\">{1}</a></li>",
                artifact.title, artifact.file
            );
        }
        let _ = writeln!(html, "</ul>");
    }
    let _ = writeln!(html, "</body></html>");

    let path = dir.join("report.html");
    fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), artifacts = artifacts.len(), "wrote report");
    Ok(path)
}
