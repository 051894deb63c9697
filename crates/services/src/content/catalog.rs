use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use conjugator_core::model::{AppSettings, Course, DataSourceId};

use super::source::ContentSource;

/// Result of a `CourseCatalog::load` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The loaded courses replaced the catalog contents.
    Applied { courses: usize },
    /// The selection changed or a newer load started; the result was dropped.
    Discarded,
}

#[derive(Debug, Default)]
struct CatalogState {
    generation: u64,
    selected: Option<DataSourceId>,
    courses: Vec<Course>,
    is_loading: bool,
}

/// Courses loaded from every configured data source, plus the current selection.
///
/// Every load is tagged with a generation number. Changing the selection or
/// starting another load bumps the generation, and a load that completes under
/// an older generation is discarded instead of overwriting newer state.
pub struct CourseCatalog {
    source: Arc<dyn ContentSource>,
    state: Mutex<CatalogState>,
}

impl CourseCatalog {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            state: Mutex::new(CatalogState {
                is_loading: true,
                ..CatalogState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load one course per configured data source, in settings order.
    ///
    /// Sources that fail to load are logged and skipped.
    pub async fn load(&self, settings: &AppSettings) -> LoadOutcome {
        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.selected = settings.selected_data_source().cloned();
            state.is_loading = true;
            state.generation
        };

        let mut courses = Vec::with_capacity(settings.data_sources().len());
        for data_source in settings.data_sources() {
            match self.source.fetch_course(data_source).await {
                Ok(course) => {
                    debug!(target: "content", %data_source, levels = course.levels().len(), "course loaded");
                    courses.push(course);
                }
                Err(err) => {
                    warn!(target: "content", %data_source, error = %err, "course unavailable");
                }
            }
        }

        let mut state = self.state();
        if state.generation != generation {
            debug!(target: "content", generation, current = state.generation, "discarding stale course load");
            return LoadOutcome::Discarded;
        }
        let loaded = courses.len();
        state.courses = courses;
        state.is_loading = false;
        info!(target: "content", courses = loaded, "course catalog updated");
        LoadOutcome::Applied { courses: loaded }
    }

    /// Change the selected data source.
    ///
    /// Any load still in flight becomes stale and the catalog stops reporting
    /// `is_loading` until the next `load`.
    pub fn select(&self, data_source: Option<DataSourceId>) {
        let mut state = self.state();
        if state.selected != data_source {
            state.selected = data_source;
            state.generation += 1;
            state.is_loading = false;
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    #[must_use]
    pub fn selected_data_source(&self) -> Option<DataSourceId> {
        self.state().selected.clone()
    }

    #[must_use]
    pub fn courses(&self) -> Vec<Course> {
        self.state().courses.clone()
    }

    /// The course for the selected data source, or the first course loaded.
    #[must_use]
    pub fn selected_course(&self) -> Option<Course> {
        let state = self.state();
        state
            .courses
            .iter()
            .find(|course| Some(course.data_source()) == state.selected.as_ref())
            .or_else(|| state.courses.first())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticContentSource;
    use crate::error::ContentError;
    use async_trait::async_trait;
    use conjugator_core::model::AppSettingsDraft;
    use tokio::sync::Notify;

    fn id(raw: &str) -> DataSourceId {
        raw.parse().unwrap()
    }

    fn settings(sources: &[&str], selected: &str) -> AppSettings {
        AppSettingsDraft {
            data_sources: sources.iter().map(|s| id(s)).collect(),
            selected_data_source: Some(id(selected)),
            content_base_url: None,
        }
        .validate()
        .unwrap()
    }

    fn course(raw: &str, name: &str) -> Course {
        Course::new(id(raw), Vec::new()).with_name(Some(name.to_string()))
    }

    #[tokio::test]
    async fn loads_available_sources_and_skips_failures() {
        let source = StaticContentSource::new()
            .with_course(course("a", "A"))
            .with_course(course("c", "C"));
        let catalog = CourseCatalog::new(Arc::new(source));
        assert!(catalog.is_loading());

        let outcome = catalog.load(&settings(&["a", "b", "c"], "c")).await;
        assert_eq!(outcome, LoadOutcome::Applied { courses: 2 });
        assert!(!catalog.is_loading());
        assert_eq!(catalog.selected_course().unwrap().display_name(), "C");
    }

    #[tokio::test]
    async fn missing_selection_falls_back_to_first_course() {
        let source = StaticContentSource::new().with_course(course("a", "A"));
        let catalog = CourseCatalog::new(Arc::new(source));
        catalog.load(&settings(&["a", "b"], "b")).await;
        assert_eq!(catalog.selected_course().unwrap().display_name(), "A");
    }

    #[tokio::test]
    async fn no_courses_is_not_an_error() {
        let catalog = CourseCatalog::new(Arc::new(StaticContentSource::new()));
        let outcome = catalog.load(&settings(&["a"], "a")).await;
        assert_eq!(outcome, LoadOutcome::Applied { courses: 0 });
        assert!(catalog.selected_course().is_none());
    }

    /// Holds back the `slow` data source until released; serves others at once.
    struct GatedSource {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl GatedSource {
        fn new() -> (Self, Arc<Notify>, Arc<Notify>) {
            let started = Arc::new(Notify::new());
            let release = Arc::new(Notify::new());
            let source = Self {
                started: Arc::clone(&started),
                release: Arc::clone(&release),
            };
            (source, started, release)
        }
    }

    #[async_trait]
    impl ContentSource for GatedSource {
        async fn fetch_course(&self, data_source: &DataSourceId) -> Result<Course, ContentError> {
            if data_source.as_str() == "slow" {
                self.started.notify_one();
                self.release.notified().await;
            }
            Ok(Course::new(data_source.clone(), Vec::new()))
        }
    }

    #[tokio::test]
    async fn load_is_discarded_when_selection_changes_midway() {
        let (source, started, release) = GatedSource::new();
        let catalog = CourseCatalog::new(Arc::new(source));
        let slow = settings(&["slow"], "slow");

        let load = catalog.load(&slow);
        let switch = async {
            started.notified().await;
            catalog.select(Some(id("other")));
            release.notify_one();
        };
        let (outcome, ()) = tokio::join!(load, switch);

        assert_eq!(outcome, LoadOutcome::Discarded);
        assert!(!catalog.is_loading());
        assert!(catalog.courses().is_empty());
        assert_eq!(catalog.selected_data_source(), Some(id("other")));

        let reload = settings(&["fast", "other"], "other");
        assert_eq!(
            catalog.load(&reload).await,
            LoadOutcome::Applied { courses: 2 }
        );
        assert_eq!(catalog.selected_course().unwrap().data_source(), &id("other"));
    }

    #[tokio::test]
    async fn newer_load_wins_over_an_older_one_still_in_flight() {
        let (source, started, release) = GatedSource::new();
        let catalog = CourseCatalog::new(Arc::new(source));
        let slow = settings(&["slow"], "slow");
        let fast = settings(&["fast"], "fast");

        let older = catalog.load(&slow);
        let newer = async {
            started.notified().await;
            let outcome = catalog.load(&fast).await;
            release.notify_one();
            outcome
        };
        let (older, newer) = tokio::join!(older, newer);

        assert_eq!(older, LoadOutcome::Discarded);
        assert_eq!(newer, LoadOutcome::Applied { courses: 1 });
        assert!(!catalog.is_loading());
        let courses = catalog.courses();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].data_source(), &id("fast"));
        assert_eq!(catalog.selected_data_source(), Some(id("fast")));
    }

    #[tokio::test]
    async fn reselecting_the_same_source_keeps_the_load() {
        let source = StaticContentSource::new().with_course(course("a", "A"));
        let catalog = CourseCatalog::new(Arc::new(source));
        catalog.select(Some(id("a")));
        let outcome = catalog.load(&settings(&["a"], "a")).await;
        assert_eq!(outcome, LoadOutcome::Applied { courses: 1 });
    }
}
