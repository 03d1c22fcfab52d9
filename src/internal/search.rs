/// Averages two bit positions without overflowing.
fn average(x: u64, y: u64) -> u64 {
    (x >> 1) + (y >> 1) + (x & y & 1)
}

/// Finds the smallest position in `start .. limit` at which `f` reaches
/// `target`; requires that `f` be monotonically non-decreasing.
///
/// Does not call `f` on positions outside the given interval.
pub fn binary_search_function<F>(mut start: u64, mut limit: u64, target: u64, f: F) -> Option<u64>
where
    F: Fn(u64) -> u64,
{
    if start >= limit {
        return None;
    }
    if f(start) >= target {
        return Some(start);
    }

    // The answer isn't `start`, so every candidate `mid` below has a
    // predecessor in the domain of `f`.
    start += 1;

    while start < limit {
        let mid = average(start, limit);

        if f(mid) >= target {
            if f(mid - 1) < target {
                return Some(mid);
            } else {
                limit = mid;
            }
        } else {
            start = mid + 1;
        }
    }

    None
}
