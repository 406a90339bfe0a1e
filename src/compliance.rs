//! Rule based policy checks over the subjects of a recognized day.
//!
//! A [`ComplianceChecker`] runs every registered [`ComplianceRule`] and the
//! timetable is NEP friendly only if none of them reports an issue. The
//! default checker carries just [`SubjectCountRule`].

use tracing::debug;

/// More subjects than this in one day is flagged.
pub const DEFAULT_MAX_SUBJECTS: usize = 6;

/// Subjects that do not count as academic load.
const NON_ACADEMIC: [&str; 3] = ["PE", "Art", "Free"];

pub trait ComplianceRule {
    /// Returns the issue text when `subjects` violates the rule.
    fn evaluate(&self, subjects: &[String]) -> Option<String>;
}

#[derive(Clone, Copy, Debug)]
pub struct SubjectCountRule {
    pub max_subjects: usize,
}

impl Default for SubjectCountRule {
    fn default() -> Self {
        SubjectCountRule {
            max_subjects: DEFAULT_MAX_SUBJECTS,
        }
    }
}

impl ComplianceRule for SubjectCountRule {
    fn evaluate(&self, subjects: &[String]) -> Option<String> {
        (subjects.len() > self.max_subjects).then(|| "Too many subjects per day".to_string())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AcademicLoadRule {
    pub max_academic: usize,
}

impl Default for AcademicLoadRule {
    fn default() -> Self {
        AcademicLoadRule { max_academic: 4 }
    }
}

impl ComplianceRule for AcademicLoadRule {
    fn evaluate(&self, subjects: &[String]) -> Option<String> {
        let academic = subjects
            .iter()
            .filter(|s| !NON_ACADEMIC.contains(&s.as_str()))
            .count();
        (academic > self.max_academic).then(|| "Too many academic periods".to_string())
    }
}

/// Flags a run of more than `max_in_row` academic periods; any PE, Art or
/// Free period ends the run.
#[derive(Clone, Copy, Debug)]
pub struct ConsecutiveAcademicRule {
    pub max_in_row: usize,
}

impl Default for ConsecutiveAcademicRule {
    fn default() -> Self {
        ConsecutiveAcademicRule { max_in_row: 4 }
    }
}

impl ComplianceRule for ConsecutiveAcademicRule {
    fn evaluate(&self, subjects: &[String]) -> Option<String> {
        let mut in_row = 0;
        for subject in subjects {
            if NON_ACADEMIC.contains(&subject.as_str()) {
                in_row = 0;
                continue;
            }
            in_row += 1;
            if in_row > self.max_in_row {
                return Some(format!(
                    "More than {} academic classes in a row",
                    self.max_in_row
                ));
            }
        }
        None
    }
}

/// Every day needs at least one PE or Art period.
#[derive(Clone, Copy, Debug, Default)]
pub struct WellnessSessionRule;

impl ComplianceRule for WellnessSessionRule {
    fn evaluate(&self, subjects: &[String]) -> Option<String> {
        let has_session = subjects.iter().any(|s| s == "PE" || s == "Art");
        (!has_session).then(|| "Missing wellness/art session".to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplianceReport {
    pub is_nep_friendly: bool,
    pub issues: Vec<String>,
}

pub struct ComplianceChecker {
    rules: Vec<Box<dyn ComplianceRule>>,
}

impl ComplianceChecker {
    pub fn new(max_subjects: usize) -> Self {
        ComplianceChecker {
            rules: vec![Box::new(SubjectCountRule { max_subjects })],
        }
    }

    pub fn with_rule<R: ComplianceRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn check(&self, subjects: &[String]) -> ComplianceReport {
        let issues: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(subjects))
            .collect();
        debug!(subjects = subjects.len(), issues = issues.len(), "compliance checked");
        ComplianceReport {
            is_nep_friendly: issues.is_empty(),
            issues,
        }
    }
}

impl Default for ComplianceChecker {
    fn default() -> Self {
        ComplianceChecker::new(DEFAULT_MAX_SUBJECTS)
    }
}
