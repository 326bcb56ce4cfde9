use std::time::Duration;

use rand::Rng;

use crate::gpa;
use crate::semester::{SemesterRecord, clamp_sgpa};

/// Timing for the dancing-dots intro played once per chart mount.
#[derive(Clone, Debug)]
pub struct IntroConfig {
    /// Delay between mount and the first frame, leaving room for the host's
    /// own entrance animation.
    pub delay: Duration,
    /// Total playback time.
    pub duration: Duration,
    /// Progress fraction at which the motion starts settling.
    pub ease_out_start: f64,
    pub wave: WaveRanges,
}

impl Default for IntroConfig {
    fn default() -> Self {
        IntroConfig {
            delay: Duration::from_millis(1520),
            duration: Duration::from_millis(1500),
            ease_out_start: 0.8,
            wave: WaveRanges::default(),
        }
    }
}

/// Inclusive-exclusive bounds for one randomized wave parameter.
#[derive(Clone, Copy, Debug)]
pub struct WaveRange {
    pub min: f64,
    pub max: f64,
}

impl WaveRange {
    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Bounds for the two superposed sine components of each dot's motion.
#[derive(Clone, Debug)]
pub struct WaveRanges {
    pub primary_frequency: WaveRange,
    pub primary_amplitude: WaveRange,
    pub secondary_frequency: WaveRange,
    pub secondary_amplitude: WaveRange,
}

impl Default for WaveRanges {
    fn default() -> Self {
        WaveRanges {
            primary_frequency: WaveRange { min: 1.5, max: 3.0 },
            primary_amplitude: WaveRange { min: 0.4, max: 1.0 },
            secondary_frequency: WaveRange { min: 2.0, max: 4.0 },
            secondary_amplitude: WaveRange { min: 0.2, max: 0.3 },
        }
    }
}

/// Per-dot wave parameters, generated once when the intro starts and held
/// stable across frames so each dot follows one continuous path.
#[derive(Clone, Copy, Debug)]
pub struct WaveParams {
    pub frequency: f64,
    pub amplitude: f64,
    pub phase_offset: f64,
    pub frequency2: f64,
    pub amplitude2: f64,
    pub phase_offset2: f64,
}

pub fn generate_wave_parameters<R: Rng>(
    count: usize,
    ranges: &WaveRanges,
    rng: &mut R,
) -> Vec<WaveParams> {
    (0..count)
        .map(|_| WaveParams {
            frequency: ranges.primary_frequency.sample(rng),
            amplitude: ranges.primary_amplitude.sample(rng),
            phase_offset: rng.gen_range(0.0..std::f64::consts::PI * 2.0),
            frequency2: ranges.secondary_frequency.sample(rng),
            amplitude2: ranges.secondary_amplitude.sample(rng),
            phase_offset2: rng.gen_range(0.0..std::f64::consts::PI * 2.0),
        })
        .collect()
}

/// SGPA offset for one dot at the given progress (0 to 1). Two sine waves
/// keep the motion organic; past `ease_out_start` a linear fade brings the
/// offset back to zero so the dots settle instead of stopping mid-swing.
pub fn wave_offset(params: &WaveParams, progress: f64, ease_out_start: f64) -> f64 {
    let time1 = progress * params.frequency * std::f64::consts::PI * 2.0;
    let offset1 = (time1 + params.phase_offset).sin() * params.amplitude;

    let time2 = progress * params.frequency2 * std::f64::consts::PI * 2.0;
    let offset2 = (time2 + params.phase_offset2).sin() * params.amplitude2;

    let ease_factor = if progress > ease_out_start {
        1.0 - (progress - ease_out_start) / (1.0 - ease_out_start)
    } else {
        1.0
    };

    (offset1 + offset2) * ease_factor
}

/// One animation frame: every semester gets its wave offset added to the
/// ORIGINAL SGPA (never the previous frame's), clamped into the display
/// domain, earned grade points re-derived, and the cumulative values
/// recomputed over the whole batch.
pub fn apply_wave_frame(
    original: &[SemesterRecord],
    params: &[WaveParams],
    progress: f64,
    min_sgpa: f64,
    max_sgpa: f64,
    ease_out_start: f64,
) -> Vec<SemesterRecord> {
    let animated: Vec<SemesterRecord> = original
        .iter()
        .zip(params.iter())
        .map(|(sem, wave)| {
            let offset = wave_offset(wave, progress, ease_out_start);
            sem.with_sgpa(clamp_sgpa(sem.sgpa + offset, min_sgpa, max_sgpa))
        })
        .collect();

    gpa::recalculate_all_cgpas(&animated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_params() -> WaveParams {
        WaveParams {
            frequency: 2.0,
            amplitude: 0.8,
            phase_offset: 0.0,
            frequency2: 3.0,
            amplitude2: 0.25,
            phase_offset2: 1.0,
        }
    }

    #[test]
    fn generated_parameters_stay_within_ranges() {
        let ranges = WaveRanges::default();
        let mut rng = StdRng::seed_from_u64(7);
        let params = generate_wave_parameters(12, &ranges, &mut rng);
        assert_eq!(params.len(), 12);
        for p in params {
            assert!(p.frequency >= 1.5 && p.frequency < 3.0);
            assert!(p.amplitude >= 0.4 && p.amplitude < 1.0);
            assert!(p.frequency2 >= 2.0 && p.frequency2 < 4.0);
            assert!(p.amplitude2 >= 0.2 && p.amplitude2 < 0.3);
            assert!(p.phase_offset >= 0.0 && p.phase_offset < std::f64::consts::PI * 2.0);
        }
    }

    #[test]
    fn offset_is_bounded_by_combined_amplitude() {
        let params = fixed_params();
        for step in 0..=100 {
            let progress = step as f64 / 100.0;
            let offset = wave_offset(&params, progress, 0.8);
            assert!(offset.abs() <= params.amplitude + params.amplitude2 + 1e-9);
        }
    }

    #[test]
    fn ease_out_tail_shrinks_toward_zero() {
        let params = fixed_params();
        // at full progress the ease factor is exactly zero
        assert_eq!(wave_offset(&params, 1.0, 0.8), 0.0);
        let raw = wave_offset(&params, 0.9, 2.0); // ease disabled
        let eased = wave_offset(&params, 0.9, 0.8);
        assert!(eased.abs() <= raw.abs() + 1e-12);
    }

    #[test]
    fn frame_keeps_structure_and_domain() {
        let original = vec![
            SemesterRecord::new(1, 9.8, 20.0),
            SemesterRecord::new(2, 0.2, 24.0),
            SemesterRecord::new(3, 5.0, 18.0),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let params = generate_wave_parameters(original.len(), &WaveRanges::default(), &mut rng);

        let frame = apply_wave_frame(&original, &params, 0.37, 0.0, 10.0, 0.8);
        assert_eq!(frame.len(), original.len());
        for (sem, before) in frame.iter().zip(original.iter()) {
            assert!(sem.sgpa >= 0.0 && sem.sgpa <= 10.0);
            assert_eq!(sem.total_course_credit, before.total_course_credit);
            assert_eq!(sem.semester_number, before.semester_number);
            assert!((sem.earned_grade_points - sem.sgpa * sem.total_course_credit).abs() < 1e-9);
        }
        // frames derive from the original data, which stays untouched
        assert_eq!(original[0].sgpa, 9.8);
    }

    #[test]
    fn frames_are_deterministic_for_fixed_parameters() {
        let original = vec![
            SemesterRecord::new(1, 7.0, 20.0),
            SemesterRecord::new(2, 8.0, 20.0),
        ];
        let params = vec![fixed_params(); 2];
        let a = apply_wave_frame(&original, &params, 0.5, 0.0, 10.0, 0.8);
        let b = apply_wave_frame(&original, &params, 0.5, 0.0, 10.0, 0.8);
        assert_eq!(a, b);
    }
}
