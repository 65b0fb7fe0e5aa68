//! Per-subject vital-sign state and readings.
//!
//! A [`SubjectState`] owns one random stream and five metric values.
//! Construction and every tick draw from the stream in a fixed order
//! (heart rate, SpO2, systolic, diastolic, temperature); that order is
//! part of the determinism contract and must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prng::{random_walk, SeededRng};

/// Random-walk parameters for one metric.
struct WalkParams {
    step: f64,
    min: f64,
    max: f64,
}

const HEART_RATE: WalkParams = WalkParams { step: 6.0, min: 60.0, max: 100.0 };
const SPO2: WalkParams = WalkParams { step: 0.6, min: 95.0, max: 100.0 };
const SYSTOLIC: WalkParams = WalkParams { step: 8.0, min: 100.0, max: 140.0 };
const DIASTOLIC: WalkParams = WalkParams { step: 6.0, min: 60.0, max: 90.0 };
const TEMPERATURE: WalkParams = WalkParams { step: 0.6, min: 97.0, max: 100.0 };

/// Live simulation state for one subject.
///
/// Mutated in place on every tick; snapshots are taken with
/// [`SubjectState::snapshot`]. The embedded stream is private to the
/// subject, so ticks on different subjects never interleave draws.
#[derive(Debug, Clone)]
pub struct SubjectState {
    rng: SeededRng,
    heart_rate: f64,
    spo2: f64,
    systolic: f64,
    diastolic: f64,
    temperature: f64,
}

impl SubjectState {
    /// Build the initial state for an identity string.
    ///
    /// Base values are drawn deterministically from the identity seed:
    /// heart rate 70-80, SpO2 96-99, systolic 115-125, diastolic 75-83,
    /// temperature 98-99.5.
    #[must_use]
    pub fn from_identity(identity: &str) -> Self {
        let mut rng = SeededRng::from_identity(identity);

        let heart_rate = 70.0 + (rng.next_f64() * 10.0).round();
        let spo2 = 96.0 + rng.next_f64() * 3.0;
        let systolic = 115.0 + (rng.next_f64() * 10.0).round();
        let diastolic = 75.0 + (rng.next_f64() * 8.0).round();
        let temperature = 98.0 + rng.next_f64() * 1.5;

        Self { rng, heart_rate, spo2, systolic, diastolic, temperature }
    }

    /// Advance every metric by one random-walk step.
    pub fn tick(&mut self) {
        self.heart_rate = random_walk(
            self.heart_rate, &mut self.rng,
            HEART_RATE.step, HEART_RATE.min, HEART_RATE.max,
        );
        self.spo2 = random_walk(
            self.spo2, &mut self.rng,
            SPO2.step, SPO2.min, SPO2.max,
        );
        self.systolic = random_walk(
            self.systolic, &mut self.rng,
            SYSTOLIC.step, SYSTOLIC.min, SYSTOLIC.max,
        );
        self.diastolic = random_walk(
            self.diastolic, &mut self.rng,
            DIASTOLIC.step, DIASTOLIC.min, DIASTOLIC.max,
        );
        self.temperature = random_walk(
            self.temperature, &mut self.rng,
            TEMPERATURE.step, TEMPERATURE.min, TEMPERATURE.max,
        );
    }

    /// Take an immutable reading of the current metrics.
    ///
    /// Heart rate and blood pressure round to whole units; SpO2 and
    /// temperature round to one decimal. The timestamp is wall-clock
    /// time at the moment of the snapshot.
    #[must_use]
    pub fn snapshot(&self, subject_id: &str) -> VitalsReading {
        VitalsReading {
            subject_id: subject_id.to_string(),
            timestamp: Utc::now(),
            heart_rate: self.heart_rate.round() as u32,
            spo2: (self.spo2 * 10.0).round() / 10.0,
            systolic: self.systolic.round() as u32,
            diastolic: self.diastolic.round() as u32,
            temperature: (self.temperature * 10.0).round() / 10.0,
        }
    }

    /// Raw (unrounded) metric values, in draw order.
    #[must_use]
    pub fn raw_metrics(&self) -> [f64; 5] {
        [self.heart_rate, self.spo2, self.systolic, self.diastolic, self.temperature]
    }

    /// Whether every metric lies within its declared range.
    ///
    /// Always true given correct clamping; a violation is a programming
    /// defect, not a runtime condition to recover from.
    #[must_use]
    pub fn in_bounds(&self) -> bool {
        (HEART_RATE.min..=HEART_RATE.max).contains(&self.heart_rate)
            && (SPO2.min..=SPO2.max).contains(&self.spo2)
            && (SYSTOLIC.min..=SYSTOLIC.max).contains(&self.systolic)
            && (DIASTOLIC.min..=DIASTOLIC.max).contains(&self.diastolic)
            && (TEMPERATURE.min..=TEMPERATURE.max).contains(&self.temperature)
    }
}

/// An immutable vital-signs snapshot for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsReading {
    /// Identity the reading belongs to.
    pub subject_id: String,
    /// Wall-clock time of the snapshot.
    pub timestamp: DateTime<Utc>,
    /// Beats per minute.
    pub heart_rate: u32,
    /// Oxygen saturation, percent, one decimal.
    pub spo2: f64,
    /// Systolic pressure, mmHg.
    pub systolic: u32,
    /// Diastolic pressure, mmHg.
    pub diastolic: u32,
    /// Body temperature, degrees Fahrenheit, one decimal.
    pub temperature: f64,
}

/// A subject known to the persistence roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    /// Opaque subject identity.
    pub id: String,
    /// When the subject was registered.
    pub created_at: DateTime<Utc>,
}
