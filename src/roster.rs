use serde::Serialize;
use thiserror::Error;

pub const MIN_FORM: i64 = 1;
pub const MAX_FORM: i64 = 4;
pub const MAX_SCORE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("student id already exists: {0}")]
    DuplicateId(String),

    #[error("student not found: {0}")]
    StudentNotFound(String),

    #[error("student {0} is already in Form 4")]
    AlreadyAtMaxForm(String),

    #[error("form must be between 1 and 4, got {0}")]
    InvalidForm(i64),

    #[error("{subject} score must be between 0 and 100, got {value}")]
    InvalidScore { subject: &'static str, value: i64 },

    #[error("missing {0}")]
    MissingField(&'static str),
}

impl RosterError {
    /// Stable code used in the IPC error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::DuplicateId(_) => "duplicate_id",
            RosterError::StudentNotFound(_) => "not_found",
            RosterError::AlreadyAtMaxForm(_) => "already_max_form",
            RosterError::InvalidForm(_)
            | RosterError::InvalidScore { .. }
            | RosterError::MissingField(_) => "bad_params",
        }
    }
}

/// Grade level, always within `MIN_FORM..=MAX_FORM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Form(i64);

impl Form {
    pub fn new(v: i64) -> Result<Self, RosterError> {
        if (MIN_FORM..=MAX_FORM).contains(&v) {
            Ok(Self(v))
        } else {
            Err(RosterError::InvalidForm(v))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }

    fn next(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subjects {
    pub math: i64,
    pub english: i64,
    pub science: i64,
    pub social: i64,
}

impl Subjects {
    pub fn new(math: i64, english: i64, science: i64, social: i64) -> Result<Self, RosterError> {
        let s = Self {
            math,
            english,
            science,
            social,
        };
        for (subject, value) in s.named() {
            if !(0..=MAX_SCORE).contains(&value) {
                return Err(RosterError::InvalidScore { subject, value });
            }
        }
        Ok(s)
    }

    pub fn named(&self) -> [(&'static str, i64); 4] {
        [
            ("math", self.math),
            ("english", self.english),
            ("science", self.science),
            ("social", self.social),
        ]
    }

    pub fn values(&self) -> [i64; 4] {
        [self.math, self.english, self.science, self.social]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub form: Form,
    pub subjects: Subjects,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub age: String,
    pub form: Form,
    pub performance: Vec<PerformanceRecord>,
}

impl Student {
    pub fn record_for(&self, form: Form) -> Option<&PerformanceRecord> {
        self.performance.iter().find(|p| p.form == form)
    }
}

#[derive(Debug, Clone)]
pub struct NewStudent<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub gender: &'a str,
    pub age: &'a str,
    pub form: Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Replaced,
}

pub fn normalize_id(id: &str) -> String {
    id.trim().to_uppercase()
}

fn required(v: &str, field: &'static str) -> Result<String, RosterError> {
    let v = v.trim();
    if v.is_empty() {
        return Err(RosterError::MissingField(field));
    }
    Ok(v.to_string())
}

/// In-memory roster. Students keep their registration order.
#[derive(Debug, Default)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn register(&mut self, new: NewStudent<'_>) -> Result<&Student, RosterError> {
        let id = normalize_id(new.id);
        if id.is_empty() {
            return Err(RosterError::MissingField("studentId"));
        }
        if self.find(&id).is_some() {
            return Err(RosterError::DuplicateId(id));
        }
        let student = Student {
            id,
            name: required(new.name, "name")?,
            gender: required(new.gender, "gender")?,
            age: required(new.age, "age")?,
            form: new.form,
            performance: Vec::new(),
        };
        self.students.push(student);
        Ok(&self.students[self.students.len() - 1])
    }

    pub fn find(&self, id: &str) -> Option<&Student> {
        let id = normalize_id(id);
        self.students.iter().find(|s| s.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Student, RosterError> {
        let id = normalize_id(id);
        self.students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RosterError::StudentNotFound(id))
    }

    pub fn promote(&mut self, id: &str) -> Result<&Student, RosterError> {
        let student = self.find_mut(id)?;
        match student.form.next() {
            Some(next) => {
                student.form = next;
                Ok(&*student)
            }
            None => Err(RosterError::AlreadyAtMaxForm(student.id.clone())),
        }
    }

    /// Returns false when no student had that id.
    pub fn delete(&mut self, id: &str) -> bool {
        let id = normalize_id(id);
        match self.students.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.students.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn upsert_performance(
        &mut self,
        id: &str,
        form: Form,
        subjects: Subjects,
    ) -> Result<(&Student, Upsert), RosterError> {
        let student = self.find_mut(id)?;
        let outcome = match student.performance.iter_mut().find(|p| p.form == form) {
            Some(existing) => {
                existing.subjects = subjects;
                Upsert::Replaced
            }
            None => {
                student.performance.push(PerformanceRecord { form, subjects });
                Upsert::Created
            }
        };
        Ok((&*student, outcome))
    }

    pub fn filter(&self, search_term: &str, form_filter: Option<Form>) -> Vec<&Student> {
        let term = search_term.trim().to_lowercase();
        self.students
            .iter()
            .filter(|s| {
                s.id.to_lowercase().contains(&term) || s.name.to_lowercase().contains(&term)
            })
            .filter(|s| form_filter.map(|f| s.form == f).unwrap_or(true))
            .collect()
    }
}
