use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use tern_core::Precision;

/// An exact binary rational `num / 2^scale`.
///
/// All arithmetic is exact: operations align scales by left-shifting the
/// coarser numerator, so no rounding ever happens. The only operations that
/// change precision are the tree navigation operators [`Dyadic::refine_left`],
/// [`Dyadic::refine_right`] and [`Dyadic::coarsen`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dyadic {
    num: BigInt,
    scale: Precision,
}

impl Dyadic {
    /// Creates a dyadic from a numerator and a binary scale.
    pub fn new(num: impl Into<BigInt>, scale: Precision) -> Self {
        Self {
            num: num.into(),
            scale,
        }
    }

    /// Creates the integer `n` at scale 0.
    pub fn from_int(n: i64) -> Self {
        Self::new(n, 0)
    }

    /// Returns the numerator.
    pub fn num(&self) -> &BigInt {
        &self.num
    }

    /// Returns the binary scale (the exponent of the power-of-two denominator).
    pub fn scale(&self) -> Precision {
        self.scale
    }

    /// Moves `n` levels down the refinement tree toward the left child.
    ///
    /// The denoted value is unchanged: `num / 2^scale == (num << n) / 2^(scale+n)`.
    pub fn refine_left(&self, n: Precision) -> Self {
        if n <= 0 {
            self.clone()
        } else {
            Self::new(&self.num << n as usize, self.scale + n)
        }
    }

    /// Moves `n` levels down the refinement tree toward the right child.
    ///
    /// Viewed as the left endpoint of a width-2 node, this lands on the left
    /// endpoint of the node's rightmost descendant: `((num + 2) << n) - 2`.
    pub fn refine_right(&self, n: Precision) -> Self {
        if n <= 0 {
            self.clone()
        } else {
            Self::new(((&self.num + 2) << n as usize) - 2, self.scale + n)
        }
    }

    /// Moves `n` levels up the refinement tree.
    ///
    /// Coarsening floor-divides the numerator by `2^n` (round toward negative
    /// infinity), which is the unique choice for which the coarser node
    /// `[k', k'+2] / 2^(scale-n)` still contains the original point for every
    /// sign of the numerator. `coarsen(n)` after `refine_left(n)` is the
    /// identity; after `refine_right(n)` it lands one step to the right
    /// (`next`), the +-1 adjustment inherent to the redundant encoding.
    pub fn coarsen(&self, n: Precision) -> Self {
        if n <= 0 {
            self.clone()
        } else {
            let divisor = BigInt::from(1) << n as usize;
            Self::new(self.num.div_floor(&divisor), self.scale - n)
        }
    }

    /// The next node code at the same scale (`num + 2`).
    pub fn next(&self) -> Self {
        Self::new(&self.num + 2, self.scale)
    }

    /// The previous node code at the same scale (`num - 2`).
    pub fn prev(&self) -> Self {
        Self::new(&self.num - 2, self.scale)
    }

    /// Returns the negation.
    pub fn neg(&self) -> Self {
        Self::new(-&self.num, self.scale)
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Self::new(self.num.abs(), self.scale)
    }

    /// Exact addition with scale alignment to the finer operand.
    pub fn add(&self, other: &Dyadic) -> Self {
        if self.scale == other.scale {
            Self::new(&self.num + &other.num, self.scale)
        } else {
            let scale = self.scale.max(other.scale);
            let lhs = &self.num << (scale - self.scale) as usize;
            let rhs = &other.num << (scale - other.scale) as usize;
            Self::new(lhs + rhs, scale)
        }
    }

    /// Exact subtraction.
    pub fn sub(&self, other: &Dyadic) -> Self {
        self.add(&other.neg())
    }

    /// Exact multiplication; scales add.
    pub fn mul(&self, other: &Dyadic) -> Self {
        Self::new(&self.num * &other.num, self.scale + other.scale)
    }

    /// Returns the smaller of the two values.
    pub fn min(&self, other: &Dyadic) -> Self {
        if self <= other {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Returns the larger of the two values.
    pub fn max(&self, other: &Dyadic) -> Self {
        if self >= other {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Lossy conversion for display and diagnostics.
    pub fn to_f64(&self) -> f64 {
        let num = self.num.to_f64().unwrap_or(f64::NAN);
        num * 2f64.powf(-(self.scale as f64))
    }

    /// Exact decimal rendering (`num * 5^scale` with the point inserted).
    pub fn to_decimal_string(&self) -> String {
        if self.scale <= 0 {
            return (&self.num << (-self.scale) as usize).to_string();
        }
        let mantissa: BigInt = &self.num * BigInt::from(5).pow(self.scale as u32);
        let negative = mantissa.is_negative();
        let digits = mantissa.abs().to_string();
        let places = self.scale as usize;
        let padded = if digits.len() <= places {
            format!("{}{}", "0".repeat(places + 1 - digits.len()), digits)
        } else {
            digits
        };
        let split = padded.len() - places;
        let sign = if negative { "-" } else { "" };
        format!("{}{}.{}", sign, &padded[..split], &padded[split..])
    }
}

impl PartialEq for Dyadic {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Dyadic {}

impl PartialOrd for Dyadic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dyadic {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.scale == other.scale {
            self.num.cmp(&other.num)
        } else {
            let scale = self.scale.max(other.scale);
            let lhs = &self.num << (scale - self.scale) as usize;
            let rhs = &other.num << (scale - other.scale) as usize;
            lhs.cmp(&rhs)
        }
    }
}

impl fmt::Display for Dyadic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}) = {}", self.num, self.scale, self.to_decimal_string())
    }
}

impl From<i64> for Dyadic {
    fn from(n: i64) -> Self {
        Dyadic::from_int(n)
    }
}

impl Zero for Dyadic {
    fn zero() -> Self {
        Dyadic::from_int(0)
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl std::ops::Add for Dyadic {
    type Output = Dyadic;

    fn add(self, rhs: Dyadic) -> Dyadic {
        Dyadic::add(&self, &rhs)
    }
}
