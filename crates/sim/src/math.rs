//! WAD-scaled fixed point helpers shared by the simulation.

use alloy_primitives::U256;

/// Fixed point scale (1e18)
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Basis point denominator
pub const MAX_BPS: u64 = 10_000;

/// Seconds in a year, used to derive per-second rates from APRs
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Rounding direction for share/asset conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingDirection {
    Down,
    Up,
}

/// Multiply then divide with explicit rounding. A zero denominator yields zero.
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: RoundingDirection) -> U256 {
    match rounding {
        RoundingDirection::Down => mul_div_down(a, b, denominator),
        RoundingDirection::Up => mul_div_up(a, b, denominator),
    }
}

/// `a * b / denominator`, rounding down. A zero denominator yields zero.
pub fn mul_div_down(a: U256, b: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::ZERO;
    }
    a * b / denominator
}

/// `a * b / denominator`, rounding up. A zero denominator yields zero.
pub fn mul_div_up(a: U256, b: U256, denominator: U256) -> U256 {
    if denominator.is_zero() {
        return U256::ZERO;
    }
    let product = a * b;
    let quotient = product / denominator;
    if (quotient * denominator) < product {
        quotient + U256::from(1)
    } else {
        quotient
    }
}

/// WAD-scaled multiplication, rounding down
pub fn w_mul_down(a: U256, b: U256) -> U256 {
    mul_div_down(a, b, WAD)
}

/// WAD-scaled division, rounding down
pub fn w_div_down(a: U256, b: U256) -> U256 {
    mul_div_down(a, WAD, b)
}

/// `a - b`, floored at zero
pub fn zero_floor_sub(a: U256, b: U256) -> U256 {
    if b > a {
        U256::ZERO
    } else {
        a - b
    }
}

/// Basis-point fraction of an amount, rounding down
pub fn bps_mul(amount: U256, bps: u64) -> U256 {
    mul_div_down(amount, U256::from(bps), U256::from(MAX_BPS))
}

/// Minimum of two amounts
pub fn min(a: U256, b: U256) -> U256 {
    if a < b {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        let a = U256::from(10);
        let b = U256::from(10);
        let d = U256::from(3);
        assert_eq!(mul_div(a, b, d, RoundingDirection::Down), U256::from(33));
        assert_eq!(mul_div(a, b, d, RoundingDirection::Up), U256::from(34));
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div_down(U256::from(10), U256::from(10), U256::ZERO),
            U256::ZERO
        );
        assert_eq!(
            mul_div_up(U256::from(10), U256::from(10), U256::ZERO),
            U256::ZERO
        );
    }

    #[test]
    fn test_w_mul_down() {
        // 2.0 * 1.5 = 3.0
        let two = U256::from(2) * WAD;
        let one_and_half = WAD + WAD / U256::from(2);
        assert_eq!(w_mul_down(two, one_and_half), U256::from(3) * WAD);
    }

    #[test]
    fn test_zero_floor_sub() {
        assert_eq!(zero_floor_sub(U256::from(5), U256::from(3)), U256::from(2));
        assert_eq!(zero_floor_sub(U256::from(3), U256::from(5)), U256::ZERO);
    }

    #[test]
    fn test_bps_mul() {
        // 10% of 1000
        assert_eq!(bps_mul(U256::from(1000), 1000), U256::from(100));
        assert_eq!(bps_mul(U256::from(1000), 0), U256::ZERO);
        assert_eq!(bps_mul(U256::from(1000), MAX_BPS), U256::from(1000));
    }
}
