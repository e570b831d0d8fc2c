//! `model.config` reader.
//!
//! The descriptor is parsed strictly up front into [`ModelMetadata`]; any
//! problem that disqualifies the model surfaces as a [`PipelineError`]
//! here rather than later in the pipeline.

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use tracing::warn;

use crate::error::PipelineError;
use crate::models::{DescriptorEntry, ModelMetadata};

/// Reads and validates model descriptors.
pub struct DescriptorReader;

impl DescriptorReader {
    /// File name of the descriptor inside each model directory.
    pub const FILE_NAME: &'static str = "model.config";

    /// Read `model.config` from `model_dir`.
    pub async fn read(model_dir: &Path) -> Result<ModelMetadata, PipelineError> {
        let path = model_dir.join(Self::FILE_NAME);
        let text = tokio::fs::read_to_string(&path).await.map_err(|source| {
            PipelineError::DescriptorUnreadable {
                path: path.clone(),
                source,
            }
        })?;
        Self::parse(&text, &path)
    }

    /// Parse descriptor text. `path` is only used in messages.
    pub fn parse(text: &str, path: &Path) -> Result<ModelMetadata, PipelineError> {
        let doc = Document::parse(text).map_err(|source| PipelineError::DescriptorMalformed {
            path: path.to_path_buf(),
            source,
        })?;

        let model = doc.root_element();
        if !model.has_tag_name("model") {
            return Err(PipelineError::MissingModelElement {
                path: path.to_path_buf(),
            });
        }

        let name = child_text(model, "name").unwrap_or_default();
        if name.is_empty() {
            return Err(PipelineError::MissingName {
                path: path.to_path_buf(),
            });
        }

        let description = child_text(model, "description").unwrap_or_default();
        if description.is_empty() {
            warn!(descriptor = %path.display(), "Missing <description>");
        }

        let entries: Vec<DescriptorEntry> = model
            .children()
            .filter(|n| n.is_element() && n.has_tag_name("sdf"))
            .map(|n| DescriptorEntry {
                version: Self::parse_version(n.attribute("version")),
                path: element_text(n),
            })
            .collect();

        if entries.is_empty() {
            warn!(descriptor = %path.display(), "Unable to read the <sdf> element");
        }

        let selected = Self::select_highest(&entries).cloned();

        Ok(ModelMetadata {
            name,
            description,
            entries,
            selected,
        })
    }

    /// Parse a `version` attribute from its leading number.
    ///
    /// Trailing text is ignored, so `"1.6.0"` reads as `1.6`. A value with
    /// no leading number counts as `0.0`.
    pub fn parse_version(raw: Option<&str>) -> f64 {
        raw.and_then(|v| leading_number(v.trim_start()))
            .and_then(|n| n.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Pick the entry with the strictly greatest version.
    ///
    /// An entry only replaces the current pick when its version is larger,
    /// so among equal versions the first declared one wins.
    pub fn select_highest(entries: &[DescriptorEntry]) -> Option<&DescriptorEntry> {
        let mut best: Option<&DescriptorEntry> = None;
        let mut max_version = f64::NEG_INFINITY;

        for entry in entries {
            if entry.version > max_version {
                max_version = entry.version;
                best = Some(entry);
            }
        }

        best
    }

    /// Resolve the selected SDF file under `model_dir`, requiring it to exist.
    pub fn resolve_selected(
        model_dir: &Path,
        metadata: &ModelMetadata,
    ) -> Result<PathBuf, PipelineError> {
        let relative = metadata
            .selected
            .as_ref()
            .map(|e| e.path.clone())
            .unwrap_or_default();
        let path = model_dir.join(&relative);

        if relative.is_empty() || !path.is_file() {
            return Err(PipelineError::DescriptorFileMissing { relative, path });
        }

        Ok(path)
    }
}

/// Longest prefix of `s` shaped like a decimal float: optional sign,
/// digits with an optional fraction, then an optional exponent.
fn leading_number(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    Some(&s[..end])
}

/// Trimmed text of the first `tag` child of `node`.
fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(tag))
        .map(element_text)
}

/// All text below `node`, trimmed.
fn element_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
