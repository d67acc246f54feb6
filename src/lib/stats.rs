/// Round `value` to `digits` decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// `count / total` rounded to `digits` decimals, computed on the integers
/// with ties going to the even neighbour.
///
/// Two complementary shares (`a + b == total`) whose exact values sit on the
/// same midpoint never both round up, so their rounded sum stays at most 1.
pub fn round_share(count: usize, total: usize, digits: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let scale = 10u128.pow(digits);
    let scaled = count as u128 * scale;
    let total = total as u128;
    let mut quotient = scaled / total;
    let twice_remainder = 2 * (scaled % total);
    if twice_remainder > total || (twice_remainder == total && quotient % 2 == 1) {
        quotient += 1;
    }
    quotient as f64 / scale as f64
}

/// `n` evenly spaced points from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Divide every value by the maximum so the peak becomes 1.0.
/// Curves whose maximum is zero or not finite are left as all-zero.
pub fn normalize_by_max(values: &mut [f64]) {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() && max > 0.0 {
        values.iter_mut().for_each(|v| *v /= max);
    } else {
        values.iter_mut().for_each(|v| *v = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.1234567, 6), 0.123457);
        assert_eq!(round_to(0.55555, 4), 0.5556);
        assert_eq!(round_to(1.0, 4), 1.0);
        assert!(round_to(f64::NAN, 4).is_nan());
    }

    #[test]
    fn test_round_share() {
        assert_eq!(round_share(1, 3, 4), 0.3333);
        assert_eq!(round_share(2, 3, 4), 0.6667);
        assert_eq!(round_share(5, 5, 4), 1.0);
        assert_eq!(round_share(0, 7, 4), 0.0);
        assert_eq!(round_share(3, 0, 4), 0.0);
        // Exact midpoints go to the even neighbour
        assert_eq!(round_share(7_685, 100_000, 4), 0.0768);
        assert_eq!(round_share(92_315, 100_000, 4), 0.9232);
        assert_eq!(round_share(7_675, 100_000, 4), 0.0768);
    }

    #[test]
    fn test_complementary_shares_never_exceed_one() {
        for total in [99_999usize, 100_000, 100_001, 20_000, 30] {
            for count in 0..=total.min(2_000) {
                let sum = round_share(count, total, 4) + round_share(total - count, total, 4);
                assert!(sum <= 1.0, "{} / {} rounds to a sum of {}", count, total, sum);
            }
        }
    }

    #[test]
    fn test_linspace() {
        let x = linspace(0.0, 1.0, 5);
        assert_eq!(x, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(0.0, 1.0, 1), vec![0.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        let x = linspace(-0.3, 0.7, 200);
        assert_eq!(x.len(), 200);
        assert_eq!(*x.last().unwrap(), 0.7);
    }

    #[test]
    fn test_normalize_by_max() {
        let mut y = vec![1.0, 4.0, 2.0];
        normalize_by_max(&mut y);
        assert_eq!(y, vec![0.25, 1.0, 0.5]);

        let mut y = vec![0.0, 0.0];
        normalize_by_max(&mut y);
        assert_eq!(y, vec![0.0, 0.0]);

        let mut y = vec![1.0, f64::INFINITY];
        normalize_by_max(&mut y);
        assert_eq!(y, vec![0.0, 0.0]);
    }
}
