use rand::Rng;

/// Candidate inter-keystroke delays, in milliseconds.
///
/// One of these is drawn uniformly at random per visible character; the
/// spread is what makes the pacing read as human rather than metronomic.
pub const TYPING_INTERVALS_MS: [u64; 3] = [60, 120, 180];

/// Pick one delay uniformly at random from `intervals`.
pub fn pick_interval(intervals: &[u64], rng: &mut impl Rng) -> u64 {
    intervals[rng.gen_range(0..intervals.len())]
}

/// Delay to wait before typing `c`.
///
/// Whitespace types instantly; everything else gets a random candidate
/// interval. Indentation runs would otherwise dominate the pacing.
pub fn delay_for_char(c: char, intervals: &[u64], rng: &mut impl Rng) -> u64 {
    if c.is_whitespace() {
        0
    } else {
        pick_interval(intervals, rng)
    }
}

/// Mean of the candidate intervals, used for duration estimates.
pub fn mean_interval_ms(intervals: &[u64]) -> u64 {
    if intervals.is_empty() {
        return 0;
    }
    intervals.iter().sum::<u64>() / intervals.len() as u64
}
