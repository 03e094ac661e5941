// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_course;
use crate::{
    Catalog, CitySeatInfo, Course, CourseId, CourseType, Decimal, OTHER_INSTITUTES, SeatCounts,
};
use std::collections::BTreeMap;

fn create_course(id: &str, course_type: CourseType, branch: &str, city: &str, institute: &str) -> Course {
    Course::new(
        CourseId::new(id),
        course_type,
        branch,
        city,
        institute,
        Decimal::from(500),
        SeatCounts {
            total: 4,
            left: 2,
            locked: 2,
        },
    )
    .unwrap()
}

fn create_test_catalog() -> Catalog {
    Catalog::new(vec![
        create_course("1", CourseType::Iti, "Welder", "Bhopal", "iti bhopal"),
        create_course("2", CourseType::BTech, "mechanical", "Bhopal", "rgpv"),
        create_course("3", CourseType::BTech, "Civil", "Indore", ""),
        create_course("4", CourseType::MTech, "VLSI", "bhopal", "manit"),
        create_course("5", CourseType::BTech, "Aeronautical", "Bhopal", "rgpv"),
    ])
}

#[test]
fn test_catalog_is_sorted_by_type_then_branch() {
    let catalog: Catalog = create_test_catalog();
    let ids: Vec<&str> = catalog.courses().iter().map(|c| c.id().value()).collect();
    assert_eq!(ids, vec!["4", "5", "3", "2", "1"]);
}

#[test]
fn test_find_course() {
    let catalog: Catalog = create_test_catalog();
    assert!(catalog.find(&CourseId::new("3")).is_some());
    assert!(catalog.find(&CourseId::new("99")).is_none());
}

#[test]
fn test_courses_for_step() {
    let catalog: Catalog = create_test_catalog();
    assert!(catalog.courses_for_step(0).unwrap().is_empty());
    assert_eq!(catalog.courses_for_step(2).unwrap().len(), 3);
    assert_eq!(catalog.courses_for_step(5).unwrap().len(), 1);
    assert!(catalog.courses_for_step(9).is_err());
}

#[test]
fn test_city_seat_info_uses_verbatim_city_keys() {
    let catalog: Catalog = create_test_catalog();
    let info: BTreeMap<String, CitySeatInfo> = catalog.city_seat_info();
    assert_eq!(info.len(), 3);
    assert_eq!(
        info.get("Bhopal"),
        Some(&CitySeatInfo {
            total_seats: 12,
            available_seats: 6,
        })
    );
    assert_eq!(info.get("bhopal").map(|i| i.total_seats), Some(4));
}

#[test]
fn test_courses_in_city_ignores_case() {
    let catalog: Catalog = create_test_catalog();
    let all: Vec<&Course> = catalog.courses_in_city("BHOPAL", None);
    assert_eq!(all.len(), 4);

    let btech: Vec<&Course> = catalog.courses_in_city("bhopal", Some(CourseType::BTech));
    let branches: Vec<&str> = btech.iter().map(|c| c.branch()).collect();
    assert_eq!(branches, vec!["Aeronautical", "mechanical"]);
}

#[test]
fn test_courses_by_institute_title_cases_and_defaults() {
    let catalog: Catalog = create_test_catalog();
    let bhopal: BTreeMap<String, Vec<&Course>> = catalog.courses_by_institute("Bhopal", None);
    assert_eq!(bhopal.get("Rgpv").map(Vec::len), Some(2));
    assert_eq!(bhopal.get("Iti Bhopal").map(Vec::len), Some(1));

    let indore: BTreeMap<String, Vec<&Course>> = catalog.courses_by_institute("Indore", None);
    assert_eq!(indore.get(OTHER_INSTITUTES).map(Vec::len), Some(1));
}

#[test]
fn test_empty_catalog() {
    let catalog: Catalog = Catalog::default();
    assert!(catalog.is_empty());
    assert!(catalog.city_seat_info().is_empty());
    let course: Course = create_test_course("1", CourseType::Diploma, "Bhopal", 0);
    assert_eq!(Catalog::new(vec![course]).len(), 1);
}
