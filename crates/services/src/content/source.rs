use async_trait::async_trait;
use std::collections::HashMap;

use conjugator_core::model::{Course, DataSourceId};

use crate::error::ContentError;

/// Where courses come from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the course published under `data_source`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` on network or parse failures.
    async fn fetch_course(&self, data_source: &DataSourceId) -> Result<Course, ContentError>;
}

/// In-memory content, for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticContentSource {
    courses: HashMap<DataSourceId, Course>,
}

impl StaticContentSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.insert(course.data_source().clone(), course);
        self
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn fetch_course(&self, data_source: &DataSourceId) -> Result<Course, ContentError> {
        self.courses
            .get(data_source)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(data_source.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_registered_courses_only() {
        let known: DataSourceId = "known".parse().unwrap();
        let source = StaticContentSource::new().with_course(Course::new(known.clone(), Vec::new()));

        let course = source.fetch_course(&known).await.unwrap();
        assert_eq!(course.data_source(), &known);

        let missing: DataSourceId = "missing".parse().unwrap();
        assert!(matches!(
            source.fetch_course(&missing).await,
            Err(ContentError::NotFound(id)) if id == "missing"
        ));
    }
}
