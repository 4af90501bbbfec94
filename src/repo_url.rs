use crate::error::{ Error, Result };
use std::fmt;

/// A repository on the hosting service, optionally pinned to a branch,
/// tag or commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub reference: Option<String>,
}

impl RepoRef {
    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        if reference.is_some() {
            self.reference = reference;
        }
        self
    }

    /// `owner/repo` without the reference.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reference {
            Some(reference) => write!(f, "{}/{}@{}", self.owner, self.repo, reference),
            None => write!(f, "{}/{}", self.owner, self.repo),
        }
    }
}

/// Accepts `owner/repo`, `owner/repo@ref`, and github.com URLs with an
/// optional `/tree/<ref>` suffix.
pub fn parse(input: &str) -> Result<RepoRef> {
    let invalid = || Error::InvalidRepository(input.to_string());

    let trimmed = input.trim();
    let trimmed = trimmed.split(['?', '#']).next().unwrap_or("");
    let (rest, is_url) = strip_host(trimmed).ok_or_else(invalid)?;

    let mut parts = rest.split('/');
    let owner = parts.next().unwrap_or("");
    let repo = parts.next().unwrap_or("");
    let tail: Vec<&str> = parts.filter(|part| !part.is_empty()).collect();

    let (repo, mut reference) = match repo.split_once('@') {
        Some((repo, reference)) if !is_url => (repo, Some(reference.to_string())),
        _ => (repo, None),
    };
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    if !valid_segment(owner) || !valid_segment(repo) {
        return Err(invalid());
    }

    match tail.split_first() {
        None => {}
        Some((&"tree", path)) if is_url && !path.is_empty() => {
            reference = Some(path.join("/"));
        }
        // other github.com pages (issues, pulls, ...) still name the repository
        Some(_) if is_url => {}
        Some(_) => {
            return Err(invalid());
        }
    }
    if reference.as_deref() == Some("") {
        return Err(invalid());
    }

    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        reference,
    })
}

fn strip_host(input: &str) -> Option<(&str, bool)> {
    let without_scheme = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"));
    let has_scheme = without_scheme.is_some();
    let rest = without_scheme.unwrap_or(input);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    match rest.strip_prefix("github.com/") {
        Some(path) => Some((path, true)),
        None if has_scheme => None,
        None => Some((rest, false)),
    }
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty() &&
        segment != "." &&
        segment != ".." &&
        segment.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(owner: &str, name: &str, reference: Option<&str>) -> RepoRef {
        RepoRef {
            owner: owner.to_string(),
            repo: name.to_string(),
            reference: reference.map(str::to_string),
        }
    }

    #[test]
    fn parses_short_form() {
        assert_eq!(parse("rust-lang/cargo").unwrap(), repo("rust-lang", "cargo", None));
        assert_eq!(parse("  tokio-rs/tokio  ").unwrap(), repo("tokio-rs", "tokio", None));
    }

    #[test]
    fn parses_short_form_with_reference() {
        assert_eq!(parse("serde-rs/serde@v1.0.0").unwrap(), repo("serde-rs", "serde", Some("v1.0.0")));
    }

    #[test]
    fn parses_urls() {
        let expected = repo("rust-lang", "rust", None);
        for input in [
            "https://github.com/rust-lang/rust",
            "https://github.com/rust-lang/rust/",
            "http://www.github.com/rust-lang/rust.git",
            "github.com/rust-lang/rust",
            "https://github.com/rust-lang/rust/issues",
            "https://github.com/rust-lang/rust?tab=readme",
        ] {
            assert_eq!(parse(input).unwrap(), expected, "input: {}", input);
        }
    }

    #[test]
    fn parses_tree_url_reference_with_slashes() {
        assert_eq!(
            parse("https://github.com/owner/repo/tree/feature/login").unwrap(),
            repo("owner", "repo", Some("feature/login"))
        );
    }

    #[test]
    fn rejects_invalid_identifiers() {
        for input in [
            "",
            "justone",
            "/repo",
            "owner/",
            "https://gitlab.com/owner/repo",
            "owner/repo/extra",
            "own er/repo",
            "owner/repo@",
            "../repo",
        ] {
            assert!(
                matches!(parse(input), Err(Error::InvalidRepository(_))),
                "should reject {:?}",
                input
            );
        }
    }

    #[test]
    fn display_and_override() {
        let parsed = parse("a/b").unwrap();
        assert_eq!(parsed.to_string(), "a/b");
        let pinned = parsed.with_reference(Some("dev".to_string()));
        assert_eq!(pinned.to_string(), "a/b@dev");
        assert_eq!(pinned.slug(), "a/b");
        assert_eq!(pinned.clone().with_reference(None), pinned);
    }
}
