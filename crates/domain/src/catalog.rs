// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Course, CourseId, CourseType};
use crate::validation::title_case;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Institute label used when a course has no institute name.
pub const OTHER_INSTITUTES: &str = "Other Institutes";

/// Aggregate seat availability for one city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CitySeatInfo {
    /// Sum of total seats over all courses in the city.
    pub total_seats: u64,
    /// Sum of seats still available.
    pub available_seats: u64,
}

/// A validated snapshot of the remote catalog.
///
/// Courses are kept in canonical order: course type first, then branch
/// (case-insensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    courses: Vec<Course>,
}

fn by_branch(a: &Course, b: &Course) -> Ordering {
    a.branch()
        .to_lowercase()
        .cmp(&b.branch().to_lowercase())
        .then_with(|| a.id().cmp(b.id()))
}

fn canonical_order(a: &Course, b: &Course) -> Ordering {
    a.course_name()
        .cmp(&b.course_name())
        .then_with(|| by_branch(a, b))
}

/// Institute label shown for a course.
#[must_use]
pub fn institute_label(course: &Course) -> String {
    let label: String = title_case(course.institute_name());
    if label.is_empty() {
        String::from(OTHER_INSTITUTES)
    } else {
        label
    }
}

impl Catalog {
    /// Creates a catalog from already-validated courses.
    #[must_use]
    pub fn new(mut courses: Vec<Course>) -> Self {
        courses.sort_by(canonical_order);
        Self { courses }
    }

    /// All courses in canonical order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Number of courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog has no courses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Looks up a course by id.
    #[must_use]
    pub fn find(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == id)
    }

    /// Courses of one type, in branch order.
    #[must_use]
    pub fn courses_of_type(&self, course_type: CourseType) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| c.course_name() == course_type)
            .collect()
    }

    /// Courses shown on a selection step.
    ///
    /// Step 0 has no course type and shows nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStep` for steps above 5.
    pub fn courses_for_step(&self, step: u8) -> Result<Vec<&Course>, DomainError> {
        Ok(CourseType::from_step(step)?
            .map(|t| self.courses_of_type(t))
            .unwrap_or_default())
    }

    /// Seat totals per city, keyed by the city name verbatim.
    #[must_use]
    pub fn city_seat_info(&self) -> BTreeMap<String, CitySeatInfo> {
        let mut info: BTreeMap<String, CitySeatInfo> = BTreeMap::new();
        for course in &self.courses {
            let entry: &mut CitySeatInfo = info.entry(course.city().to_string()).or_default();
            entry.total_seats += u64::from(course.total_seats());
            entry.available_seats += u64::from(course.left_seats());
        }
        info
    }

    /// Courses in a city, optionally restricted to one course type.
    ///
    /// City matching ignores case.
    #[must_use]
    pub fn courses_in_city(&self, city: &str, course_type: Option<CourseType>) -> Vec<&Course> {
        let city: String = city.trim().to_lowercase();
        let mut courses: Vec<&Course> = self
            .courses
            .iter()
            .filter(|c| c.city().to_lowercase() == city)
            .filter(|c| course_type.is_none_or(|t| c.course_name() == t))
            .collect();
        courses.sort_by(|a, b| canonical_order(a, b));
        courses
    }

    /// Courses in a city grouped under their institute label.
    #[must_use]
    pub fn courses_by_institute(
        &self,
        city: &str,
        course_type: Option<CourseType>,
    ) -> BTreeMap<String, Vec<&Course>> {
        let mut grouped: BTreeMap<String, Vec<&Course>> = BTreeMap::new();
        for course in self.courses_in_city(city, course_type) {
            grouped.entry(institute_label(course)).or_default().push(course);
        }
        grouped
    }
}
