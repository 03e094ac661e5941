// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Course, CourseId, CourseType, Decimal, DomainError, MAX_PRICE_PER_SEAT, Otp, PaymentMethod,
    SeatCounts, Selection,
};
use std::str::FromStr;

#[test]
fn test_course_type_round_trips_display_names() {
    for course_type in CourseType::ALL {
        let parsed: CourseType = CourseType::from_str(course_type.as_str()).unwrap();
        assert_eq!(parsed, course_type);
    }
}

#[test]
fn test_course_type_rejects_unknown_name() {
    let result: Result<CourseType, DomainError> = CourseType::from_str("PhD");
    assert_eq!(
        result,
        Err(DomainError::UnknownCourseType(String::from("PhD")))
    );
}

#[test]
fn test_course_type_from_str_is_case_sensitive() {
    assert!(CourseType::from_str("b.tech").is_err());
    assert_eq!(CourseType::parse_loose("b.tech"), Some(CourseType::BTech));
    assert_eq!(CourseType::parse_loose(" iti "), Some(CourseType::Iti));
}

#[test]
fn test_course_type_steps() {
    assert_eq!(CourseType::from_step(0), Ok(None));
    assert_eq!(CourseType::from_step(1), Ok(Some(CourseType::MTech)));
    assert_eq!(CourseType::from_step(5), Ok(Some(CourseType::Iti)));
    assert_eq!(CourseType::from_step(6), Err(DomainError::InvalidStep(6)));
    for course_type in CourseType::ALL {
        assert_eq!(
            CourseType::from_step(course_type.step()),
            Ok(Some(course_type))
        );
    }
}

#[test]
fn test_course_type_serializes_with_catalog_names() {
    let json: String = serde_json::to_string(&CourseType::MTech).unwrap();
    assert_eq!(json, "\"M.Tech\"");
    let parsed: CourseType = serde_json::from_str("\"ITI\"").unwrap();
    assert_eq!(parsed, CourseType::Iti);
}

#[test]
fn test_course_rejects_left_seats_above_total() {
    let result: Result<Course, DomainError> = Course::new(
        CourseId::new("1"),
        CourseType::BTech,
        "Civil",
        "Bhopal",
        "Institute",
        Decimal::from(1000),
        SeatCounts {
            total: 5,
            left: 6,
            locked: 0,
        },
    );
    assert!(matches!(
        result,
        Err(DomainError::LeftSeatsExceedTotal {
            left_seats: 6,
            total_seats: 5,
            ..
        })
    ));
}

#[test]
fn test_course_rejects_zero_price() {
    let result: Result<Course, DomainError> = Course::new(
        CourseId::new("1"),
        CourseType::BTech,
        "Civil",
        "Bhopal",
        "Institute",
        Decimal::ZERO,
        SeatCounts {
            total: 5,
            left: 5,
            locked: 0,
        },
    );
    assert!(matches!(result, Err(DomainError::InvalidPrice { .. })));
}

#[test]
fn test_course_price_for_seats() {
    let course: Course = super::create_test_course("1", CourseType::BTech, "Bhopal", 5);
    assert_eq!(course.price_for(3), Ok(Decimal::from(3000)));
    assert_eq!(course.price_for(0), Ok(Decimal::ZERO));
}

#[test]
fn test_course_price_at_limit_covers_every_seat_count() {
    let course: Course = Course::new(
        CourseId::new("1"),
        CourseType::BTech,
        "Civil",
        "Bhopal",
        "Institute",
        Decimal::from(MAX_PRICE_PER_SEAT),
        SeatCounts {
            total: u32::MAX,
            left: u32::MAX,
            locked: 0,
        },
    )
    .unwrap();

    let total: Decimal = course.price_for(u32::MAX).unwrap();
    assert_eq!(
        total,
        Decimal::from(MAX_PRICE_PER_SEAT) * Decimal::from(u32::MAX)
    );
}

#[test]
fn test_course_rejects_price_above_limit() {
    let result: Result<Course, DomainError> = Course::new(
        CourseId::new("1"),
        CourseType::BTech,
        "Civil",
        "Bhopal",
        "Institute",
        Decimal::from(MAX_PRICE_PER_SEAT) + Decimal::ONE,
        SeatCounts {
            total: 5,
            left: 5,
            locked: 0,
        },
    );
    assert!(matches!(result, Err(DomainError::InvalidPrice { .. })));
}

#[test]
fn test_deselected_selection_is_empty() {
    let selection: Selection = Selection::deselected();
    assert!(!selection.is_selected);
    assert_eq!(selection.seats, None);
    assert_eq!(selection.total_price, Decimal::ZERO);
    assert!(!selection.is_committable());
}

#[test]
fn test_selection_with_zero_seats_is_not_committable() {
    let selection: Selection = Selection {
        is_selected: true,
        seats: Some(0),
        total_price: Decimal::ZERO,
    };
    assert!(!selection.is_committable());
}

#[test]
fn test_payment_method_parsing() {
    assert_eq!(PaymentMethod::from_str("upi"), Ok(PaymentMethod::Upi));
    assert_eq!(
        PaymentMethod::from_str("netbanking"),
        Ok(PaymentMethod::Netbanking)
    );
    assert!(PaymentMethod::from_str("cash").is_err());
    assert_eq!(PaymentMethod::Card.to_string(), "card");
}

#[test]
fn test_otp_requires_six_digits() {
    assert_eq!(Otp::parse("123456").unwrap().value(), "123456");
    assert_eq!(Otp::parse(" 654321 ").unwrap().value(), "654321");
    assert_eq!(Otp::parse("12345"), Err(DomainError::InvalidOtp));
    assert_eq!(Otp::parse("1234567"), Err(DomainError::InvalidOtp));
    assert_eq!(Otp::parse("12a456"), Err(DomainError::InvalidOtp));
}
