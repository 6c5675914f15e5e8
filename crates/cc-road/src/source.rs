//! Grade sources seen by the simulation driver.

use crate::generator::RoadInclinationGenerator;
use crate::profile::GradeProfile;
use cc_core::SimRng;
use rand::Rng;

/// Anything that yields a road grade (degrees) per tick.
pub trait GradeSource {
    fn grade_at(&mut self, tick: usize) -> f64;
}

impl<G: GradeSource + ?Sized> GradeSource for &mut G {
    fn grade_at(&mut self, tick: usize) -> f64 {
        (**self).grade_at(tick)
    }
}

/// Level road, no disturbance.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRoad;

impl GradeSource for FlatRoad {
    fn grade_at(&mut self, _tick: usize) -> f64 {
        0.0
    }
}

impl<R: Rng> GradeSource for RoadInclinationGenerator<R> {
    fn grade_at(&mut self, tick: usize) -> f64 {
        self.next_inclination(tick)
    }
}

impl GradeSource for GradeProfile {
    fn grade_at(&mut self, tick: usize) -> f64 {
        self.angle_at(tick)
    }
}

/// The road a run is driven on.
#[derive(Debug, Clone, Default)]
pub enum RoadProfile<R = SimRng> {
    #[default]
    Flat,
    Random(RoadInclinationGenerator<R>),
    Segmented(GradeProfile),
}

impl<R: Rng> GradeSource for RoadProfile<R> {
    fn grade_at(&mut self, tick: usize) -> f64 {
        match self {
            RoadProfile::Flat => FlatRoad.grade_at(tick),
            RoadProfile::Random(generator) => generator.grade_at(tick),
            RoadProfile::Segmented(profile) => profile.grade_at(tick),
        }
    }
}
