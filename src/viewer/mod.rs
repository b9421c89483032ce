use time::UtcOffset;
use tracing::{debug, error, info};

use crate::github::{RepoCoordinates, RevisionSource};
use crate::render::overlay::{
    FAILED_DIFF, FAILED_VERSION, LOADING_DIFF, LOADING_VERSION, diff_title, revision_title,
};
use crate::render::{DiffView, Overlay, OverlayBody, RevisionView, Timeline};
use crate::revision::Revision;
use crate::surface::Surface;

/// Revision history of one file in one repository.
///
/// Holds the revisions of the most recent load and the overlay state. Each action issues at
/// most one request and reports every state it passes through to the given [`Surface`].
#[derive(Debug)]
pub struct HistoryViewer<S> {
    source: S,
    coords: RepoCoordinates,
    offset: UtcOffset,
    revisions: Vec<Revision>,
    overlay: Overlay,
}

impl<S: RevisionSource> HistoryViewer<S> {
    pub fn new(source: S, coords: RepoCoordinates, offset: UtcOffset) -> Self {
        Self {
            source,
            coords,
            offset,
            revisions: Vec::new(),
            overlay: Overlay::Closed,
        }
    }

    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    /// Fetch the revision list, replacing whatever was held before.
    ///
    /// Failures collapse into an empty list; "unavailable" and "no history" look the same.
    #[tracing::instrument(name = "Loading version history", level = "info", skip_all, fields(path = %self.coords.path))]
    pub async fn load_revisions(&mut self, surface: &mut impl Surface) -> Timeline {
        surface.show_timeline(&Timeline::Loading);
        self.revisions = match self.source.list_revisions(&self.coords).await {
            Ok(revisions) => revisions,
            Err(e) => {
                error!("Error fetching commits: {}", e);
                Vec::new()
            }
        };
        info!("Holding {} revisions", self.revisions.len());
        let timeline = Timeline::build(&self.revisions, self.offset);
        surface.show_timeline(&timeline);
        timeline
    }

    /// Show the content of revision `index`. Returns `false` without touching anything when
    /// the index is not part of the current load.
    #[tracing::instrument(name = "Viewing version", level = "info", skip(self, surface))]
    pub async fn view_revision(&mut self, index: usize, surface: &mut impl Surface) -> bool {
        let Some(rev) = self.revisions.get(index).cloned() else {
            debug!("No revision at index {}; ignoring", index);
            return false;
        };
        let title = revision_title(&rev, self.offset);
        self.open(Overlay::loading(title.clone(), LOADING_VERSION), surface);

        let settled = match self.source.file_at(&self.coords, &rev.sha).await {
            Ok(content) if !content.is_empty() => Overlay::Open {
                title,
                body: OverlayBody::Revision(RevisionView::new(&rev, &content)),
            },
            Ok(_) => {
                error!("File content at {} is empty", rev.short_sha());
                Overlay::error(title, FAILED_VERSION)
            }
            Err(e) => {
                error!("Error fetching file content: {}", e);
                Overlay::error(title, FAILED_VERSION)
            }
        };
        self.open(settled, surface);
        true
    }

    /// Show the patch between revisions `older` and `newer`. Returns `false` without touching
    /// anything when either index is not part of the current load.
    #[tracing::instrument(name = "Viewing diff", level = "info", skip(self, surface))]
    pub async fn view_diff(
        &mut self,
        older: usize,
        newer: usize,
        surface: &mut impl Surface,
    ) -> bool {
        let (Some(older_rev), Some(newer_rev)) = (
            self.revisions.get(older).cloned(),
            self.revisions.get(newer).cloned(),
        ) else {
            debug!("No revisions at indices {} and {}; ignoring", older, newer);
            return false;
        };
        let title = diff_title(&older_rev, &newer_rev, self.offset);
        self.open(Overlay::loading(title.clone(), LOADING_DIFF), surface);

        let settled = match self
            .source
            .patch_between(&self.coords, &older_rev.sha, &newer_rev.sha)
            .await
        {
            Ok(patch) if !patch.is_empty() => Overlay::Open {
                title,
                body: OverlayBody::Diff(DiffView::new(&older_rev, &newer_rev, &patch, self.offset)),
            },
            Ok(_) => {
                error!("Diff for {} is empty", self.coords.path);
                Overlay::error(title, FAILED_DIFF)
            }
            Err(e) => {
                error!("Error fetching diff: {}", e);
                Overlay::error(title, FAILED_DIFF)
            }
        };
        self.open(settled, surface);
        true
    }

    pub fn close(&mut self, surface: &mut impl Surface) {
        self.overlay = Overlay::Closed;
        surface.show_overlay(&self.overlay);
    }

    fn open(&mut self, overlay: Overlay, surface: &mut impl Surface) {
        self.overlay = overlay;
        surface.show_overlay(&self.overlay);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    use super::*;
    use crate::render::timeline::ComparePair;
    use crate::render::diff::LineKind;
    use crate::render::timeline::NO_HISTORY;
    use crate::{AppError, AppResult};

    /// In-memory source keyed by sha; records every request it serves.
    #[derive(Default)]
    struct FakeSource {
        revisions: Option<Vec<Revision>>,
        contents: HashMap<String, String>,
        comparisons: HashMap<(String, String), Vec<(String, String)>>,
        requests: RefCell<Vec<String>>,
    }

    impl RevisionSource for FakeSource {
        async fn list_revisions(&self, _coords: &RepoCoordinates) -> AppResult<Vec<Revision>> {
            self.requests.borrow_mut().push("list".to_string());
            self.revisions
                .clone()
                .ok_or_else(|| AppError::Other("offline".to_string()))
        }

        async fn file_at(&self, _coords: &RepoCoordinates, sha: &str) -> AppResult<String> {
            self.requests.borrow_mut().push(format!("file {sha}"));
            self.contents
                .get(sha)
                .cloned()
                .ok_or_else(|| AppError::Other(format!("404 for {sha}")))
        }

        async fn patch_between(
            &self,
            coords: &RepoCoordinates,
            base: &str,
            head: &str,
        ) -> AppResult<String> {
            self.requests
                .borrow_mut()
                .push(format!("compare {base}...{head}"));
            let files = self
                .comparisons
                .get(&(base.to_string(), head.to_string()))
                .ok_or_else(|| AppError::Other("404".to_string()))?;
            files
                .iter()
                .find(|(name, _)| *name == coords.path)
                .map(|(_, patch)| patch.clone())
                .ok_or_else(|| AppError::MissingPatch(coords.path.clone()))
        }
    }

    fn is_loading(overlay: &Overlay) -> bool {
        matches!(
            overlay,
            Overlay::Open {
                body: OverlayBody::Loading { .. },
                ..
            }
        )
    }

    #[derive(Default)]
    struct RecordingSurface {
        timelines: Vec<Timeline>,
        overlays: Vec<Overlay>,
    }

    impl Surface for RecordingSurface {
        fn show_timeline(&mut self, timeline: &Timeline) {
            self.timelines.push(timeline.clone());
        }

        fn show_overlay(&mut self, overlay: &Overlay) {
            self.overlays.push(overlay.clone());
        }
    }

    const PATH: &str = "_posts/2024-01-01-hello.md";

    fn coords() -> RepoCoordinates {
        RepoCoordinates {
            owner: "octo".to_string(),
            repo: "blog".to_string(),
            path: PATH.to_string(),
        }
    }

    fn two_revisions() -> Vec<Revision> {
        vec![
            Revision {
                sha: "abc1234".to_string(),
                author: "Ada".to_string(),
                date: datetime!(2024-01-02 10:00:00 UTC),
                message: "Fix typo".to_string(),
            },
            Revision {
                sha: "def5678".to_string(),
                author: "Ada".to_string(),
                date: datetime!(2024-01-01 09:00:00 UTC),
                message: "Initial post".to_string(),
            },
        ]
    }

    fn source() -> FakeSource {
        let mut source = FakeSource {
            revisions: Some(two_revisions()),
            ..Default::default()
        };
        source.contents.insert(
            "def5678".to_string(),
            "---\nlayout: post\n---\n# Hello\n\nteh end".to_string(),
        );
        source.comparisons.insert(
            ("def5678".to_string(), "abc1234".to_string()),
            vec![
                ("README.md".to_string(), "+unrelated".to_string()),
                (PATH.to_string(), "@@ -3 +3 @@\n-teh end\n+the end".to_string()),
            ],
        );
        source.comparisons.insert(
            ("abc1234".to_string(), "def5678".to_string()),
            vec![("README.md".to_string(), "+unrelated".to_string())],
        );
        source
    }

    fn viewer(source: FakeSource) -> HistoryViewer<FakeSource> {
        HistoryViewer::new(source, coords(), UtcOffset::UTC)
    }

    #[tokio::test]
    async fn loads_timeline_after_placeholder() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();
        let timeline = viewer.load_revisions(&mut surface).await;

        assert_eq!(surface.timelines.len(), 2);
        assert_eq!(surface.timelines[0], Timeline::Loading);
        assert_eq!(surface.timelines[1], timeline);

        let Timeline::Entries { entries } = timeline else {
            panic!("expected entries");
        };
        assert_eq!(entries[0].version, 2);
        assert!(entries[0].latest);
        assert_eq!(entries[0].compare, Some(ComparePair { older: 1, newer: 0 }));
        assert_eq!(entries[1].version, 1);
        assert_eq!(entries[1].compare, None);
        assert_eq!(viewer.revisions().len(), 2);
    }

    #[tokio::test]
    async fn failed_load_renders_no_history() {
        let mut viewer = viewer(FakeSource::default());
        let mut surface = RecordingSurface::default();
        let timeline = viewer.load_revisions(&mut surface).await;

        assert_eq!(timeline, Timeline::Empty);
        let html = timeline.to_html();
        assert!(html.contains(NO_HISTORY));
        assert!(!html.contains("versions-timeline"));
    }

    #[tokio::test]
    async fn reload_replaces_revisions_wholesale() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();
        viewer.load_revisions(&mut surface).await;
        assert_eq!(viewer.revisions().len(), 2);

        viewer.source.revisions = Some(vec![two_revisions().remove(1)]);
        viewer.load_revisions(&mut surface).await;
        assert_eq!(viewer.revisions().len(), 1);
        assert_eq!(viewer.revisions()[0].sha, "def5678");

        // Index 1 was valid before the reload and is stale now.
        assert!(!viewer.view_revision(1, &mut surface).await);
    }

    #[tokio::test]
    async fn view_passes_through_loading_then_content() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();
        viewer.load_revisions(&mut surface).await;

        assert!(viewer.view_revision(1, &mut surface).await);
        assert_eq!(surface.overlays.len(), 2);
        assert!(is_loading(&surface.overlays[0]));

        let Overlay::Open {
            title,
            body: OverlayBody::Revision(view),
        } = &viewer.overlay
        else {
            panic!("expected revision view, got {:?}", &viewer.overlay);
        };
        assert_eq!(title, "Version from 1/1/2024 at 9:00:00 AM");
        assert_eq!(view.short_sha, "def5678");
        assert_eq!(view.html, "<p><h1>Hello</h1></p><p>teh end</p>");
        assert_eq!(&surface.overlays[1], &viewer.overlay);
    }

    #[tokio::test]
    async fn view_failure_shows_error_message() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();
        viewer.load_revisions(&mut surface).await;

        assert!(viewer.view_revision(0, &mut surface).await);
        assert_eq!(
            &viewer.overlay,
            &Overlay::error("Version from 1/2/2024 at 10:00:00 AM".to_string(), FAILED_VERSION)
        );
    }

    #[tokio::test]
    async fn content_is_refetched_on_every_view() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();
        viewer.load_revisions(&mut surface).await;
        viewer.view_revision(1, &mut surface).await;
        viewer.view_revision(1, &mut surface).await;

        assert_eq!(
            *viewer.source.requests.borrow(),
            vec!["list", "file def5678", "file def5678"]
        );
    }

    #[tokio::test]
    async fn stale_indices_are_silent_noops() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();

        // Nothing loaded yet.
        assert!(!viewer.view_revision(0, &mut surface).await);
        viewer.load_revisions(&mut surface).await;
        assert!(!viewer.view_revision(2, &mut surface).await);
        assert!(!viewer.view_diff(2, 0, &mut surface).await);
        assert!(!viewer.view_diff(1, 9, &mut surface).await);

        assert!(surface.overlays.is_empty());
        assert_eq!(&viewer.overlay, &Overlay::Closed);
        assert_eq!(*viewer.source.requests.borrow(), vec!["list"]);
    }

    #[tokio::test]
    async fn diff_selects_the_bound_path() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();
        viewer.load_revisions(&mut surface).await;

        assert!(viewer.view_diff(1, 0, &mut surface).await);
        assert!(is_loading(&surface.overlays[0]));
        let Overlay::Open {
            title,
            body: OverlayBody::Diff(view),
        } = &viewer.overlay
        else {
            panic!("expected diff view, got {:?}", &viewer.overlay);
        };
        assert_eq!(title, "Changes between 1/1/2024 and 1/2/2024");
        assert_eq!(view.older_message, "Initial post");
        assert_eq!(view.newer_message, "Fix typo");
        assert_eq!(
            view.lines.iter().map(|l| l.kind).collect::<Vec<_>>(),
            vec![LineKind::HunkHeader, LineKind::Deletion, LineKind::Addition]
        );
        assert_eq!(
            *viewer.source.requests.borrow(),
            vec!["list", "compare def5678...abc1234"]
        );
    }

    #[tokio::test]
    async fn diff_without_the_bound_path_fails_softly() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();
        viewer.load_revisions(&mut surface).await;

        assert!(viewer.view_diff(0, 1, &mut surface).await);
        let Overlay::Open { body, .. } = &viewer.overlay else {
            panic!("overlay should be open");
        };
        assert_eq!(
            body,
            &OverlayBody::Error {
                message: FAILED_DIFF.to_string()
            }
        );
        assert!(viewer.overlay.to_html().contains("Failed to load diff."));
    }

    #[tokio::test]
    async fn empty_content_shows_failure() {
        let mut source = source();
        source.contents.insert("abc1234".to_string(), String::new());
        source.comparisons.insert(
            ("def5678".to_string(), "abc1234".to_string()),
            vec![(PATH.to_string(), String::new())],
        );
        let mut viewer = viewer(source);
        let mut surface = RecordingSurface::default();
        viewer.load_revisions(&mut surface).await;

        assert!(viewer.view_revision(0, &mut surface).await);
        let html = viewer.overlay.to_html();
        assert!(html.contains(FAILED_VERSION));
        assert!(!html.contains("version-markdown"));

        assert!(viewer.view_diff(1, 0, &mut surface).await);
        let html = viewer.overlay.to_html();
        assert!(html.contains(FAILED_DIFF));
        assert!(!html.contains("diff-content"));
    }

    #[tokio::test]
    async fn new_view_overwrites_and_close_hides() {
        let mut viewer = viewer(source());
        let mut surface = RecordingSurface::default();
        viewer.load_revisions(&mut surface).await;

        viewer.view_revision(1, &mut surface).await;
        viewer.view_diff(1, 0, &mut surface).await;
        // Each open goes through its own loading placeholder.
        assert_eq!(
            surface
                .overlays
                .iter()
                .map(is_loading)
                .collect::<Vec<_>>(),
            vec![true, false, true, false]
        );
        assert!(matches!(
            &viewer.overlay,
            Overlay::Open {
                body: OverlayBody::Diff(_),
                ..
            }
        ));

        viewer.close(&mut surface);
        assert_eq!(&viewer.overlay, &Overlay::Closed);
        assert_eq!(surface.overlays.last(), Some(&Overlay::Closed));
    }
}
