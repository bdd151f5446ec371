//! Category definitions and the validated category table.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found while building a [`CategoryTable`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("category code cannot be empty")]
    EmptyCode,

    #[error("category {code} has an empty label")]
    EmptyLabel { code: String },

    #[error("category {code} is defined more than once")]
    DuplicateCode { code: String },

    #[error("category {code} expects {value} hours; must be a finite non-negative number")]
    InvalidExpectedHours { code: String, value: f64 },

    #[error("coursework refers to unknown category {code}")]
    UnknownCategory { code: String },
}

/// Short code identifying a category, e.g. `CV`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryCode(String);

impl CategoryCode {
    pub fn new(code: impl Into<String>) -> Result<Self, ConfigError> {
        let code = code.into();
        if code.is_empty() {
            return Err(ConfigError::EmptyCode);
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryCode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryCode> for String {
    fn from(code: CategoryCode) -> Self {
        code.0
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for CategoryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A bucket of activity with its weekly target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub code: CategoryCode,
    /// Human label, also matched as a substring of event titles.
    pub label: String,
    pub expected_hours: f64,
}

impl Category {
    pub fn new(
        code: &str,
        label: impl Into<String>,
        expected_hours: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            code: CategoryCode::new(code)?,
            label: label.into(),
            expected_hours,
        })
    }
}

/// The fixed set of categories for one run, in display order.
///
/// Built once at startup; every table that exists has unique codes, non-empty
/// labels and a coursework subset drawn from its own codes.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    categories: Vec<Category>,
    coursework: Vec<CategoryCode>,
}

impl CategoryTable {
    pub fn new(
        categories: Vec<Category>,
        coursework: Vec<CategoryCode>,
    ) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for category in &categories {
            let code = category.code.as_str();
            if category.label.is_empty() {
                return Err(ConfigError::EmptyLabel {
                    code: code.to_string(),
                });
            }
            if !category.expected_hours.is_finite() || category.expected_hours < 0.0 {
                return Err(ConfigError::InvalidExpectedHours {
                    code: code.to_string(),
                    value: category.expected_hours,
                });
            }
            if !seen.insert(code) {
                return Err(ConfigError::DuplicateCode {
                    code: code.to_string(),
                });
            }
        }

        if let Some(unknown) = coursework.iter().find(|c| !seen.contains(c.as_str())) {
            return Err(ConfigError::UnknownCategory {
                code: unknown.to_string(),
            });
        }

        Ok(Self {
            categories,
            coursework,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn coursework(&self) -> &[CategoryCode] {
        &self.coursework
    }

    pub fn get(&self, code: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.code.as_str() == code)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The default categories: course modules, side work and free time.
pub fn default_categories() -> Vec<Category> {
    [
        ("CV", "Computer Vision", 20.0),
        ("BCI", "Brain Computer Interface", 15.0),
        ("UI", "User Interface Design", 10.0),
        ("AR", "Topics in Computer Science", 10.0),
        ("MH", "Masterpieces of Western Music", 4.0),
        ("Reading", "Reading", 3.0),
        ("apply", "Job", 3.0),
        ("Coding", "Coding", 12.0),
        ("LT", "LemonTree", 3.0),
        ("Sports", "Sports", 3.0),
        ("***", "Chill Time", 11.0),
    ]
    .into_iter()
    .map(|(code, label, expected_hours)| Category {
        code: CategoryCode(code.to_string()),
        label: label.to_string(),
        expected_hours,
    })
    .collect()
}

/// Codes of the default academic categories.
pub fn default_coursework() -> Vec<CategoryCode> {
    ["CV", "BCI", "AR", "MH", "UI"]
        .into_iter()
        .map(|code| CategoryCode(code.to_string()))
        .collect()
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            coursework: default_coursework(),
        }
    }
}
