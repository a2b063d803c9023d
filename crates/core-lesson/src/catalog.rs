//! Lesson catalogs.
//!
//! A catalog is a TOML document holding a `[[lesson]]` array. The built-in
//! tutorial ships inside the binary; hosts may point at an external file
//! with the same schema instead.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{Goal, Lesson, LessonError};

const BUILTIN_CATALOG: &str = include_str!("../lessons/catalog.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "lesson")]
    lessons: Vec<Lesson>,
}

/// Validated, id-ordered collection of lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    lessons: Vec<Lesson>,
}

impl Catalog {
    /// The built-in tutorial.
    pub fn builtin() -> Result<Self, LessonError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, LessonError> {
        let file: CatalogFile = toml::from_str(src)?;
        Self::from_lessons(file.lessons)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, LessonError> {
        let src = fs::read_to_string(path).map_err(|source| LessonError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&src)?;
        debug!(target: "lesson.catalog", path = %path.display(), lessons = catalog.len(), "catalog_loaded");
        Ok(catalog)
    }

    /// Validate and sort by id.
    pub fn from_lessons(mut lessons: Vec<Lesson>) -> Result<Self, LessonError> {
        let mut ids = HashSet::new();
        for lesson in &lessons {
            if !ids.insert(lesson.id) {
                warn!(target: "lesson.catalog", id = lesson.id, "duplicate_lesson_id");
                return Err(LessonError::DuplicateId(lesson.id));
            }
            validate(lesson)?;
        }
        lessons.sort_by_key(|l| l.id);
        Ok(Self { lessons })
    }

    pub fn get(&self, id: u32) -> Result<&Lesson, LessonError> {
        self.lessons
            .iter()
            .find(|l| l.id == id)
            .ok_or(LessonError::NotFound(id))
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

fn validate(lesson: &Lesson) -> Result<(), LessonError> {
    if lesson.initial_text.is_empty() {
        warn!(target: "lesson.catalog", id = lesson.id, "empty_initial_text");
        return Err(LessonError::EmptyInitialText(lesson.id));
    }
    if let Goal::TargetPosition { row, col } = lesson.goal {
        let in_range = lesson.initial_text.get(row).is_some_and(|line| {
            let len = core_text::grapheme::count(line);
            col < len.max(1)
        });
        if !in_range {
            warn!(target: "lesson.catalog", id = lesson.id, row, col, "target_out_of_range");
            return Err(LessonError::TargetOutOfRange {
                id: lesson.id,
                row,
                col,
            });
        }
    }
    Ok(())
}
