use crate::error::{ Error, FetchCause, Result };
use crate::models::{ Entry, RepositoryInfo, TreeResponse };
use crate::repo_url::RepoRef;
use reqwest::Url;
use tracing::{ debug, info, warn };

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Entries of one repository listing as returned by the trees API.
#[derive(Debug)]
pub struct TreeListing {
    pub entries: Vec<Entry>,
    /// Set when the hosting service cut the listing short.
    pub truncated: bool,
}

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl GitHubClient {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        GitHubClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Fetches the full recursive listing of `repo`, resolving the default
    /// branch first when no reference is pinned.
    ///
    /// Every failure, including an undecodable body, is reported as
    /// [`Error::Fetch`].
    pub async fn fetch_tree(&self, repo: &RepoRef) -> Result<TreeListing> {
        let listing = self.fetch_listing(repo).await.map_err(|source| {
            debug!(repo = %repo, error = ?source, "fetch failed");
            Error::Fetch { repo: repo.to_string(), source }
        })?;
        if listing.truncated {
            warn!(repo = %repo, entries = listing.entries.len(), "listing was truncated by the API");
        }
        Ok(listing)
    }

    async fn fetch_listing(&self, repo: &RepoRef) -> std::result::Result<TreeListing, FetchCause> {
        let reference = match &repo.reference {
            Some(reference) => reference.clone(),
            None => {
                let url = self.endpoint(&["repos", repo.owner.as_str(), repo.repo.as_str()])?;
                info!(%url, "resolving default branch");
                let info: RepositoryInfo = serde_json::from_str(&self.get_text(url).await?)?;
                debug!(branch = %info.default_branch, "default branch");
                info.default_branch
            }
        };

        let mut url = self.endpoint(
            &["repos", repo.owner.as_str(), repo.repo.as_str(), "git", "trees", reference.as_str()]
        )?;
        url.query_pairs_mut().append_pair("recursive", "1");
        info!(%url, "fetching tree");
        let body = self.get_text(url).await?;

        Ok(decode_listing(&body)?)
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, FetchCause> {
        let base_url_error = || FetchCause::BaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| base_url_error())?;
        url.path_segments_mut()
            .map_err(|_| base_url_error())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> std::result::Result<String, reqwest::Error> {
        let res = self.request(url).send().await?.error_for_status()?.text().await?;

        Ok(res)
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", self.user_agent.as_str())
            .header("X-GitHub-Api-Version", "2022-11-28")
    }
}

fn decode_listing(body: &str) -> serde_json::Result<TreeListing> {
    let response: TreeResponse = serde_json::from_str(body)?;
    Ok(TreeListing {
        entries: response.tree.into_iter().map(Entry::from).collect(),
        truncated: response.truncated,
    })
}

/// Decodes a saved trees API response body.
pub fn parse_tree_listing(body: &str) -> Result<TreeListing> {
    Ok(decode_listing(body)?)
}
