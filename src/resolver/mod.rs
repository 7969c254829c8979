//! Latest-release resolution from upstream tag refs.

use crate::core::types::{Release, Workshop};
use crate::core::versioning::compare_versions;
use crate::error::{Result, WorkshopError};
use crate::traits::{GitHubApi, TagRef};
use crate::ui;

const TAG_REF_PREFIX: &str = "refs/tags/";

pub struct ReleaseResolver<'a> {
    github: &'a dyn GitHubApi,
}

impl<'a> ReleaseResolver<'a> {
    pub fn new(github: &'a dyn GitHubApi) -> Self {
        Self { github }
    }

    /// Highest tag of the workshop's upstream repository.
    ///
    /// An unreachable upstream and a repository without tags both surface as
    /// [`WorkshopError::NoTaggedRelease`].
    pub fn get_latest_release(&self, workshop: &Workshop) -> Result<Release> {
        let owner = &workshop.github_owner;
        let repo = &workshop.github_repo_name;
        let no_release = || WorkshopError::NoTaggedRelease {
            owner: owner.clone(),
            repo: repo.clone(),
        };

        let tags = match self.github.tags(owner, repo) {
            Ok(tags) => tags,
            Err(e) => {
                ui::verbose(&format!("Tag lookup for {}/{} failed: {}", owner, repo, e));
                return Err(no_release());
            }
        };

        let release = latest_release(tags).ok_or_else(no_release)?;
        ui::verbose(&format!(
            "Latest release of {}/{} is {} ({})",
            owner, repo, release.tag, release.sha
        ));
        Ok(release)
    }
}

pub(crate) fn latest_release(tags: Vec<TagRef>) -> Option<Release> {
    let mut releases: Vec<Release> = tags
        .into_iter()
        .map(|tag| Release {
            tag: tag
                .reference
                .strip_prefix(TAG_REF_PREFIX)
                .unwrap_or(&tag.reference)
                .to_string(),
            sha: tag.object.sha,
        })
        .collect();

    releases.sort_by(|a, b| compare_versions(&b.tag, &a.tag));
    releases.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TagObject;

    struct Tags(std::result::Result<Vec<&'static str>, &'static str>);

    impl GitHubApi for Tags {
        fn tags(&self, _owner: &str, _repo: &str) -> Result<Vec<TagRef>> {
            match &self.0 {
                Ok(names) => Ok(names.iter().map(|n| tag(n)).collect()),
                Err(msg) => Err(WorkshopError::RemoteFetchError(msg.to_string())),
            }
        }

        fn archive(&self, _owner: &str, _repo: &str, _reference: &str) -> Result<Vec<u8>> {
            unreachable!("resolver never downloads")
        }
    }

    fn tag(name: &str) -> TagRef {
        TagRef {
            reference: format!("refs/tags/{}", name),
            object: TagObject {
                sha: format!("sha-{}", name),
            },
        }
    }

    fn workshop() -> Workshop {
        Workshop {
            code: "learnyouphp".to_string(),
            display_name: "Learn you PHP".to_string(),
            github_owner: "php-school".to_string(),
            github_repo_name: "learn-you-php".to_string(),
            description: String::new(),
            kind: "core".to_string(),
        }
    }

    #[test]
    fn picks_highest_semantic_version() {
        let github = Tags(Ok(vec!["1.0.0", "2.0.0", "1.5.0"]));
        let release = ReleaseResolver::new(&github)
            .get_latest_release(&workshop())
            .expect("release");
        assert_eq!(release.tag, "2.0.0");
        assert_eq!(release.sha, "sha-2.0.0");
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        let github = Tags(Ok(vec!["2.0.0", "10.0.0", "9.1.0"]));
        let release = ReleaseResolver::new(&github)
            .get_latest_release(&workshop())
            .expect("release");
        assert_eq!(release.tag, "10.0.0");
    }

    #[test]
    fn empty_tag_list_has_no_release() {
        let github = Tags(Ok(vec![]));
        let err = ReleaseResolver::new(&github)
            .get_latest_release(&workshop())
            .expect_err("no tags");
        assert!(matches!(err, WorkshopError::NoTaggedRelease { .. }));
    }

    #[test]
    fn upstream_failure_collapses_to_no_release() {
        let github = Tags(Err("connection refused"));
        let err = ReleaseResolver::new(&github)
            .get_latest_release(&workshop())
            .expect_err("offline");
        assert!(matches!(err, WorkshopError::NoTaggedRelease { .. }));
    }
}
