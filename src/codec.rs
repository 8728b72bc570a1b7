//! Real-vector encoding of timetables.
//!
//! Each course owns three consecutive genes `(day, period, room)` in the
//! instance's course order, so a vector has `3 × num_courses` genes.
//!
//! Decoding is a deterministic quotient of the continuous search space onto
//! the discrete grid:
//!
//! - `day = round(g0) mod 5`
//! - `period = round(g1) mod 8`
//! - `room = required_rooms[round(g2) mod |required_rooms|]`
//!
//! The room gene indexes the course's ascending list of acceptable rooms, so
//! every decoded room satisfies the room-type requirement by construction.
//! `mod` is Euclidean: negative genes wrap into range. Non-finite genes
//! decode as index 0.

use rand::Rng;

use crate::models::{Instance, Session, TimeSlot, Timetable, DAYS, PERIODS_PER_DAY};

/// Genes per course: day, period, room.
pub const GENES_PER_COURSE: usize = 3;

/// Maps between search vectors and timetables for one instance.
#[derive(Debug, Clone, Copy)]
pub struct SolutionCodec<'a> {
    instance: &'a Instance,
}

impl<'a> SolutionCodec<'a> {
    /// Creates a codec bound to `instance`'s course order.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Vector length.
    pub fn dimension(&self) -> usize {
        self.instance.num_courses() * GENES_PER_COURSE
    }

    /// Exclusive upper bound of each gene's initialization range.
    ///
    /// Lower bounds are all `0.0`.
    pub fn upper_bounds(&self) -> Vec<f64> {
        self.instance
            .courses()
            .iter()
            .flat_map(|course| {
                [
                    f64::from(DAYS),
                    f64::from(PERIODS_PER_DAY),
                    course.required_rooms.len() as f64,
                ]
            })
            .collect()
    }

    /// Draws a vector uniformly from the initialization box.
    pub fn random_vector<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.upper_bounds()
            .into_iter()
            .map(|hi| rng.random_range(0.0..hi))
            .collect()
    }

    /// Decodes a vector into a timetable.
    ///
    /// # Panics
    /// Panics if `genes.len() != self.dimension()`.
    pub fn decode(&self, genes: &[f64]) -> Timetable {
        assert_eq!(
            genes.len(),
            self.dimension(),
            "vector length does not match course count"
        );

        let sessions = self
            .instance
            .courses()
            .iter()
            .zip(genes.chunks_exact(GENES_PER_COURSE))
            .map(|(course, g)| {
                let day = wrap_index(g[0], u32::from(DAYS)) as u8;
                let period = wrap_index(g[1], u32::from(PERIODS_PER_DAY)) as u8;
                let room_idx = wrap_index(g[2], course.required_rooms.len() as u32) as usize;
                Session::new(
                    course.id,
                    TimeSlot::new(day, period, course.required_rooms[room_idx]),
                )
            })
            .collect();

        Timetable::new(sessions)
    }

    /// Encodes a timetable as a vector on the integer grid.
    ///
    /// Sessions are matched to courses by `course_id`. A course without a
    /// session encodes as zeros, and a room outside the course's acceptable
    /// set encodes as index 0.
    pub fn encode(&self, timetable: &Timetable) -> Vec<f64> {
        let mut genes = Vec::with_capacity(self.dimension());
        for course in self.instance.courses() {
            match timetable.session_for(course.id) {
                Some(session) => {
                    let room_idx = course
                        .required_rooms
                        .binary_search(&session.slot.room)
                        .unwrap_or(0);
                    genes.push(f64::from(session.slot.day));
                    genes.push(f64::from(session.slot.period));
                    genes.push(room_idx as f64);
                }
                None => genes.extend_from_slice(&[0.0; GENES_PER_COURSE]),
            }
        }
        genes
    }
}

/// `round(x) mod modulus`, Euclidean, with non-finite `x` mapped to 0.
fn wrap_index(x: f64, modulus: u32) -> u32 {
    if !x.is_finite() || modulus == 0 {
        return 0;
    }
    // `as i64` saturates for huge values, which is fine for a quotient map.
    (x.round() as i64).rem_euclid(i64::from(modulus)) as u32
}
