use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

/// Where view templates should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLocation {
    Builtin,
    Dir(PathBuf),
    Http(Url),
}

/// Interpret the `--templates` argument.
///
/// http(s) URLs are used as a base, with a trailing slash added so fragment
/// names resolve below it. Anything else must be an existing directory.
pub fn resolve_template_location(arg: Option<&str>) -> Result<TemplateLocation> {
    let Some(raw) = arg else {
        return Ok(TemplateLocation::Builtin);
    };

    if raw.starts_with("http://") || raw.starts_with("https://") {
        let mut url = Url::parse(raw).with_context(|| format!("Invalid template URL: {}", raw))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        return Ok(TemplateLocation::Http(url));
    }

    let dir = PathBuf::from(raw);
    if !dir.is_dir() {
        anyhow::bail!("Template directory does not exist: {}", dir.display());
    }
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize template directory: {}", raw))?;
    Ok(TemplateLocation::Dir(dir))
}
