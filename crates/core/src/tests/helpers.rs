// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{MemorySnapshotStore, SelectionStore, SnapshotStore};
use seat_adopt_domain::{
    CartLine, Catalog, Course, CourseId, CourseType, Decimal, SeatCounts, Selection,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn create_test_course(
    id: &str,
    course_type: CourseType,
    city: &str,
    institute: &str,
    price: i64,
    left: u32,
) -> Course {
    Course::new(
        CourseId::new(id),
        course_type,
        "computer science",
        city,
        institute,
        Decimal::from(price),
        SeatCounts {
            total: 10,
            left,
            locked: 10 - left,
        },
    )
    .unwrap()
}

/// Course 1 is the B.Tech course with 5 seats left at 1000 per seat.
pub fn create_test_catalog() -> Catalog {
    Catalog::new(vec![
        create_test_course("1", CourseType::BTech, "Bhopal", "rgpv bhopal", 1000, 5),
        create_test_course("2", CourseType::BTech, "Bhopal", "", 1500, 3),
        create_test_course("3", CourseType::BTech, "Indore", "iet davv", 800, 2),
        create_test_course("4", CourseType::Iti, "Bhopal", "iti govindpura", 300, 0),
    ])
}

pub fn create_test_line(id: &str, course_type: CourseType, city: &str, seats: u32, price: i64) -> CartLine {
    CartLine {
        id: CourseId::new(id),
        selected_seats: seats,
        price_per_seat: Decimal::from(price),
        total_price: Decimal::from(price) * Decimal::from(seats),
        branch: String::from("Computer Science"),
        course_name: course_type,
        city: city.to_string(),
        institute: String::from("Rgpv Bhopal"),
    }
}

pub fn selected(seats: u32, price: i64) -> Selection {
    Selection {
        is_selected: true,
        seats: Some(seats),
        total_price: Decimal::from(price) * Decimal::from(seats),
    }
}

pub fn create_loaded_store() -> SelectionStore<MemorySnapshotStore> {
    let mut store: SelectionStore<MemorySnapshotStore> =
        SelectionStore::new(MemorySnapshotStore::new());
    store.set_catalog(create_test_catalog());
    store
}

#[derive(Debug)]
pub struct StorageUnavailable;

impl std::fmt::Display for StorageUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage unavailable")
    }
}

impl std::error::Error for StorageUnavailable {}

/// Snapshot store whose writes fail while `failing` is set.
#[derive(Debug)]
pub struct SwitchableSnapshotStore {
    inner: MemorySnapshotStore,
    failing: Arc<AtomicBool>,
}

impl SwitchableSnapshotStore {
    pub fn new(failing: Arc<AtomicBool>) -> Self {
        Self {
            inner: MemorySnapshotStore::new(),
            failing,
        }
    }
}

impl SnapshotStore for SwitchableSnapshotStore {
    type Error = StorageUnavailable;

    fn load(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        self.inner.load(key).map_err(|never| match never {})
    }

    fn save(&mut self, key: &str, body: &str, schema_version: u32) -> Result<(), Self::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageUnavailable);
        }
        self.inner
            .save(key, body, schema_version)
            .map_err(|never| match never {})
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageUnavailable);
        }
        self.inner.remove(key).map_err(|never| match never {})
    }
}
