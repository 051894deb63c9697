use crate::model::ids::DataSourceId;
use crate::model::level::Level;

/// Levels published under one data source, plus an optional announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    data_source: DataSourceId,
    name: Option<String>,
    announcement_title: Option<String>,
    announcement: Option<String>,
    levels: Vec<Level>,
}

impl Course {
    pub const UNTITLED: &'static str = "Untitled Course";

    #[must_use]
    pub fn new(data_source: DataSourceId, levels: Vec<Level>) -> Self {
        Self {
            data_source,
            name: None,
            announcement_title: None,
            announcement: None,
            levels,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = normalize_optional(name);
        self
    }

    #[must_use]
    pub fn with_announcement(mut self, title: Option<String>, text: Option<String>) -> Self {
        self.announcement_title = normalize_optional(title);
        self.announcement = normalize_optional(text);
        self
    }

    #[must_use]
    pub fn data_source(&self) -> &DataSourceId {
        &self.data_source
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name to show, falling back to "Untitled Course".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(Self::UNTITLED)
    }

    #[must_use]
    pub fn announcement_title(&self) -> Option<&str> {
        self.announcement_title.as_deref()
    }

    #[must_use]
    pub fn announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_falls_back_to_untitled() {
        let course = Course::new("sheet".parse().unwrap(), Vec::new()).with_name(Some("  ".into()));
        assert_eq!(course.name(), None);
        assert_eq!(course.display_name(), "Untitled Course");
    }

    #[test]
    fn announcement_is_trimmed() {
        let course = Course::new("sheet".parse().unwrap(), Vec::new())
            .with_announcement(Some(" Hola ".into()), Some("Welcome back".into()));
        assert_eq!(course.announcement_title(), Some("Hola"));
        assert_eq!(course.announcement(), Some("Welcome back"));
    }
}
