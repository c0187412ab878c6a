/// A bracketing keyframe pair and the progress between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub index: usize,
    pub next: usize,
    /// Interpolation factor in `[0, 1]`.
    pub factor: f32,
}

/// Locate the keyframe pair around `time` by binary search.
///
/// Returns the segment `i` with `times[i] <= time < times[i + 1]`. A time
/// before the first keyframe clamps to the first segment, a time at or past
/// the last keyframe stays in the last segment. The caller wraps time with
/// [`wrap_time`] first, this never wraps by itself. Returns `None` with fewer
/// than two keyframes.
pub fn find_keyframe(times: &[f32], time: f32) -> Option<Keyframe> {
    if times.len() < 2 {
        return None;
    }
    // number of keyframes at or before `time`
    let before = times.partition_point(|&keyframe| keyframe <= time);
    let index = before.saturating_sub(1).min(times.len() - 2);
    let next = (index + 1) % times.len();

    let span = times[next] - times[index];
    let factor = if span > 0.0 {
        ((time - times[index]) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(Keyframe {
        index,
        next,
        factor,
    })
}

/// Wrap `time` into `[0, duration)`.
///
/// Non-positive durations (single keyframe samplers) always give zero.
#[inline]
pub fn wrap_time(time: f32, duration: f32) -> f32 {
    if duration > 0.0 {
        time.rem_euclid(duration)
    } else {
        0.0
    }
}

#[cfg(test)]
mod test {
    use super::{find_keyframe, wrap_time, Keyframe};

    const TIMES: [f32; 4] = [0.0, 1.0, 2.0, 5.0];

    #[test]
    fn test_bracket_inside_segment() {
        assert_eq!(
            find_keyframe(&TIMES, 1.5),
            Some(Keyframe {
                index: 1,
                next: 2,
                factor: 0.5,
            })
        );
        let keyframe = find_keyframe(&TIMES, 3.5).unwrap();
        assert_eq!(keyframe.index, 2);
        assert_eq!(keyframe.factor, 0.5);
    }

    #[test]
    fn test_bracket_on_keyframe() {
        assert_eq!(find_keyframe(&TIMES, 0.0).unwrap().index, 0);
        assert_eq!(find_keyframe(&TIMES, 0.0).unwrap().factor, 0.0);
        assert_eq!(find_keyframe(&TIMES, 1.0).unwrap().index, 1);
        assert_eq!(find_keyframe(&TIMES, 2.0).unwrap().index, 2);
    }

    #[test]
    fn test_bracket_clamps_before_first_keyframe() {
        let times = [0.5, 1.0, 2.0];
        assert_eq!(
            find_keyframe(&times, 0.2),
            Some(Keyframe {
                index: 0,
                next: 1,
                factor: 0.0,
            })
        );
    }

    #[test]
    fn test_bracket_at_end_stays_in_last_segment() {
        assert_eq!(
            find_keyframe(&TIMES, 5.0),
            Some(Keyframe {
                index: 2,
                next: 3,
                factor: 1.0,
            })
        );
        assert_eq!(find_keyframe(&TIMES, 9.0).unwrap().factor, 1.0);
    }

    #[test]
    fn test_degenerate_sequences() {
        assert_eq!(find_keyframe(&[], 1.0), None);
        assert_eq!(find_keyframe(&[0.0], 1.0), None);
        // coincident keyframes never divide by zero
        assert_eq!(find_keyframe(&[1.0, 1.0], 1.0).unwrap().factor, 0.0);
    }

    #[test]
    fn test_wrap_before_search() {
        let time = wrap_time(7.0, TIMES[3]);
        assert_eq!(time, 2.0);
        assert_eq!(find_keyframe(&TIMES, time).unwrap().index, 2);
        assert_eq!(wrap_time(5.0, 5.0), 0.0);
        assert_eq!(wrap_time(3.0, 0.0), 0.0);
    }
}
