//! Source resolver: builds the ordered candidate list for one load attempt.
//!
//! Pure and deterministic: the same [`HostingContext`] and [`SourcesConfig`]
//! always produce the same list. Co-located copies come first, then mirrors
//! derived from the hosting context, then the fixed fallback mirrors.

use crate::config::SourcesConfig;

/// Where the viewer is being served from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostingContext {
    /// Host name, if the base is a web location.
    pub host: Option<String>,
    /// Path component of the base (`/project/page.html`), or empty.
    pub path: String,
}

impl HostingContext {
    pub fn web(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self { host: Some(host.into()), path: path.into() }
    }

    /// A local base: no host, so only relative and fallback candidates apply.
    pub fn local() -> Self {
        Self::default()
    }

    /// Owner/project pair when the host matches the static-hosting suffix
    /// and the first path segment names a project.
    fn project(&self, suffix: &str) -> Option<(String, String)> {
        let host = self.host.as_deref()?.to_ascii_lowercase();
        let owner = host.strip_suffix(&suffix.to_ascii_lowercase())?;
        if owner.is_empty() || owner.contains('.') {
            return None;
        }
        let project = self.path.split('/').find(|s| !s.is_empty())?;
        Some((owner.to_string(), project.to_string()))
    }
}

/// Produce the deduplicated, ordered candidate list.
pub fn resolve(ctx: &HostingContext, cfg: &SourcesConfig) -> Vec<String> {
    let file = &cfg.file_name;
    let mut out = Vec::new();

    push_unique(&mut out, file.clone());
    push_unique(&mut out, format!("./{file}"));
    push_unique(&mut out, format!("../{file}"));

    if let Some((owner, project)) = ctx.project(&cfg.hosting_suffix) {
        for loc in mirrors(&owner, &project, cfg) {
            push_unique(&mut out, loc);
        }
    }

    for loc in mirrors(&cfg.fallback_owner, &cfg.fallback_project, cfg) {
        push_unique(&mut out, loc);
    }

    tracing::debug!(candidates = out.len(), "resolved candidate sources");
    out
}

/// Raw-content mirrors for both branches, then CDN mirrors for both branches.
fn mirrors(owner: &str, project: &str, cfg: &SourcesConfig) -> Vec<String> {
    let file = &cfg.file_name;
    let branches = [&cfg.primary_branch, &cfg.publish_branch];
    let raw = branches
        .iter()
        .map(|b| format!("https://raw.githubusercontent.com/{owner}/{project}/{b}/{file}"));
    let cdn = branches
        .iter()
        .map(|b| format!("https://cdn.jsdelivr.net/gh/{owner}/{project}@{b}/{file}"));
    raw.chain(cdn).collect()
}

fn push_unique(out: &mut Vec<String>, loc: String) {
    if !out.contains(&loc) {
        out.push(loc);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;

    fn cfg() -> SourcesConfig {
        Config::defaults().sources
    }

    #[test]
    fn local_context_gets_relative_then_fallback() {
        let got = resolve(&HostingContext::local(), &cfg());
        assert_eq!(
            got,
            vec![
                "findings.csv",
                "./findings.csv",
                "../findings.csv",
                "https://raw.githubusercontent.com/mathislef34/Udemy_Formation_Scanner/main/findings.csv",
                "https://raw.githubusercontent.com/mathislef34/Udemy_Formation_Scanner/gh-pages/findings.csv",
                "https://cdn.jsdelivr.net/gh/mathislef34/Udemy_Formation_Scanner@main/findings.csv",
                "https://cdn.jsdelivr.net/gh/mathislef34/Udemy_Formation_Scanner@gh-pages/findings.csv",
            ]
        );
    }

    #[test]
    fn static_host_adds_derived_mirrors_before_fallback() {
        let ctx = HostingContext::web("alice.github.io", "/scans/index.html");
        let got = resolve(&ctx, &cfg());
        assert_eq!(got.len(), 11);
        assert_eq!(
            got[3],
            "https://raw.githubusercontent.com/alice/scans/main/findings.csv"
        );
        assert_eq!(got[6], "https://cdn.jsdelivr.net/gh/alice/scans@gh-pages/findings.csv");
        assert!(got[7].contains("mathislef34"));
    }

    #[test]
    fn fallback_pair_is_not_repeated() {
        let ctx = HostingContext::web("mathislef34.github.io", "/Udemy_Formation_Scanner/");
        let got = resolve(&ctx, &cfg());
        assert_eq!(got.len(), 7);
        let mut dedup = got.clone();
        dedup.dedup();
        assert_eq!(dedup, got);
    }

    #[test]
    fn unrelated_host_or_missing_project_is_ignored() {
        let other = resolve(&HostingContext::web("example.com", "/scans/"), &cfg());
        let bare = resolve(&HostingContext::web("alice.github.io", "/"), &cfg());
        assert_eq!(other.len(), 7);
        assert_eq!(bare.len(), 7);
    }

    #[test]
    fn resolve_is_deterministic() {
        let ctx = HostingContext::web("Alice.GitHub.io", "/scans");
        assert_eq!(resolve(&ctx, &cfg()), resolve(&ctx, &cfg()));
    }
}
