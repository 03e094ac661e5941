// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod catalog;
mod types;

use crate::{Course, CourseId, CourseType, Decimal, SeatCounts};

pub fn create_test_course(id: &str, course_type: CourseType, city: &str, left: u32) -> Course {
    Course::new(
        CourseId::new(id),
        course_type,
        "computer science",
        city,
        "government engineering college",
        Decimal::from(1000),
        SeatCounts {
            total: 10,
            left,
            locked: 10 - left,
        },
    )
    .unwrap()
}
