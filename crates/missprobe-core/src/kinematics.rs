//! Cursor kinematics over the replay frame sequence.
//!
//! Only frames with a strictly positive delta take part. Held-key repeats
//! stay in the sequence but keep zeroed kinematic fields.

use crate::replay::ReplayFrame;

/// Fill in distance, speed and acceleration for every frame with a positive
/// delta and return the indices of those frames in order.
///
/// The first and last retained frames have speed and acceleration forced to
/// zero. Acceleration at `i` is the forward difference
/// `(speed[i + 1] - speed[i]) / delta[i + 1]`.
pub fn compute(frames: &mut [ReplayFrame]) -> Vec<usize> {
    let indices: Vec<usize> = frames
        .iter()
        .enumerate()
        .filter(|(_, f)| f.time_delta > 0)
        .map(|(i, _)| i)
        .collect();

    for frame in frames.iter_mut() {
        frame.travelled_distance = 0.0;
        frame.travelled_distance_delta = 0.0;
        frame.speed = 0.0;
        frame.acceleration = 0.0;
    }

    let Some(&last) = indices.last() else {
        return indices;
    };

    let mut distance = 0.0;
    for pair in indices.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let step = frames[from].position().distance_to(frames[to].position());
        distance += step;
        frames[to].travelled_distance = distance;
        frames[to].travelled_distance_delta = step;
        // f64 division keeps an infinite speed representable
        frames[to].speed = (frames[to].travelled_distance - frames[from].travelled_distance)
            / f64::from(frames[to].time_delta);
    }
    frames[last].speed = 0.0;

    for pair in indices.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        frames[current].acceleration =
            (frames[next].speed - frames[current].speed) / f64::from(frames[next].time_delta);
    }
    frames[indices[0]].acceleration = 0.0;
    frames[last].acceleration = 0.0;

    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::Keys;

    fn frame(time_delta: i32, time: i32, x: f32, y: f32) -> ReplayFrame {
        ReplayFrame::new(time_delta, time, x, y, Keys::NONE)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_three_frame_sequence() {
        let mut frames = vec![
            frame(16, 0, 0.0, 0.0),
            frame(10, 10, 3.0, 4.0),
            frame(10, 20, 3.0, 4.0),
        ];
        let indices = compute(&mut frames);
        assert_eq!(indices, vec![0, 1, 2]);

        let distances: Vec<f64> = frames.iter().map(|f| f.travelled_distance).collect();
        assert_eq!(distances, vec![0.0, 5.0, 5.0]);

        let speeds: Vec<f64> = frames.iter().map(|f| f.speed).collect();
        assert_eq!(speeds, vec![0.0, 0.5, 0.0]);

        assert_close(frames[0].acceleration, 0.0);
        assert_close(frames[1].acceleration, -0.05);
        assert_close(frames[2].acceleration, 0.0);
    }

    #[test]
    fn test_repeats_are_excluded() {
        let mut frames = vec![
            frame(16, 16, 0.0, 0.0),
            frame(0, 16, 100.0, 100.0),
            frame(16, 32, 6.0, 8.0),
            frame(16, 48, 6.0, 8.0),
        ];
        let indices = compute(&mut frames);
        assert_eq!(indices, vec![0, 2, 3]);

        // The repeat keeps zeroed kinematics and does not contribute distance
        assert_eq!(frames[1].travelled_distance_delta, 0.0);
        assert_eq!(frames[1].speed, 0.0);
        assert_close(frames[2].travelled_distance_delta, 10.0);
        assert_close(frames[2].speed, 10.0 / 16.0);
    }

    #[test]
    fn test_empty_and_single_frame() {
        let mut empty: Vec<ReplayFrame> = Vec::new();
        assert!(compute(&mut empty).is_empty());

        let mut single = vec![frame(5, 5, 10.0, 10.0)];
        assert_eq!(compute(&mut single), vec![0]);
        assert_eq!(single[0].speed, 0.0);
        assert_eq!(single[0].travelled_distance, 0.0);
    }
}
