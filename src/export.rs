use crate::error::{ Error, Result };
use crate::models::Directory;
use crate::tree::{ render, RenderStyle };
use clap::ValueEnum;
use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Markdown,
    Json,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }

    /// Guesses the format from an output file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "txt" => Some(ExportFormat::Text),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            "json" => Some(ExportFormat::Json),
            "html" | "htm" => Some(ExportFormat::Html),
            _ => None,
        }
    }
}

/// Serializes `root` for download. `label` names the repository in the
/// text-based formats.
pub fn export(
    format: ExportFormat,
    label: &str,
    root: &Directory,
    style: &RenderStyle
) -> Result<String> {
    let contents = match format {
        ExportFormat::Text => format!("{}\n{}", label, render(root, style)),
        ExportFormat::Markdown => format!("# {}\n\n```text\n{}```\n", label, render(root, style)),
        ExportFormat::Html => html_document(label, &render(root, style)),
        ExportFormat::Json => {
            let mut json = serde_json::to_string_pretty(root).map_err(Error::Encode)?;
            json.push('\n');
            json
        }
    };
    Ok(contents)
}

pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "wrote export");
    Ok(())
}

fn html_document(label: &str, rendering: &str) -> String {
    let title = escape_html(label);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<pre>{}</pre>\n</body>\n</html>\n",
        escape_html(rendering)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
