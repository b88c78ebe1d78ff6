//! Double-double arithmetic.
//!
//! A `DD` is the unevaluated sum `hi + lo` of two doubles with
//! `|lo| <= ulp(hi) / 2`, giving about 106 bits of mantissa. The operator
//! kernels are the classic Dekker/Knuth splitting algorithms; every operator
//! accepts either a `DD` or an `f64` on the right-hand side.

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Dekker split constant `2^27 + 1`.
const SPLIT: f64 = 134_217_729.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct DD {
    hi: f64,
    lo: f64,
}

impl DD {
    /// Relative precision of the representation (≈ 2^-106).
    pub const EPS: f64 = 1.232_595_164_407_83e-32;
    pub const PI: DD = DD {
        hi: 3.141_592_653_589_793_116e0,
        lo: 1.224_646_799_147_353_207e-16,
    };
    pub const E: DD = DD {
        hi: 2.718_281_828_459_045_091e0,
        lo: 1.445_646_891_729_250_158e-16,
    };
    pub const ZERO: DD = DD { hi: 0.0, lo: 0.0 };
    pub const ONE: DD = DD { hi: 1.0, lo: 0.0 };

    #[inline]
    pub const fn new(x: f64) -> Self {
        Self { hi: x, lo: 0.0 }
    }

    /// Build from explicit components; callers must supply a normalized pair.
    #[inline]
    pub const fn from_parts(hi: f64, lo: f64) -> Self {
        Self { hi, lo }
    }

    #[inline]
    pub fn hi(&self) -> f64 {
        self.hi
    }

    #[inline]
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Nearest double.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.hi + self.lo
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.hi == 0.0 && self.lo == 0.0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.hi < 0.0 || (self.hi == 0.0 && self.lo < 0.0)
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        self.hi.is_nan()
    }

    /// -1, 0 or 1.
    #[inline]
    pub fn signum(&self) -> i32 {
        if self.hi > 0.0 {
            1
        } else if self.hi < 0.0 {
            -1
        } else if self.lo > 0.0 {
            1
        } else if self.lo < 0.0 {
            -1
        } else {
            0
        }
    }

    #[inline]
    pub fn abs(self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self
        }
    }

    #[inline]
    pub fn sqr(self) -> Self {
        self * self
    }

    /// Square root by one Newton step from the double estimate (Karp's trick).
    pub fn sqrt(self) -> Self {
        if self.is_zero() {
            return DD::ZERO;
        }
        if self.is_negative() {
            return DD::new(f64::NAN);
        }
        let x = 1.0 / self.hi.sqrt();
        let ax = self.hi * x;
        let axdd = DD::new(ax);
        let d2 = self - axdd.sqr();
        let d = d2.hi * (x * 0.5);
        axdd + d
    }

    fn add_dd(self, yhi: f64, ylo: f64) -> Self {
        let s_big = self.hi + yhi;
        let t_big = self.lo + ylo;
        let e = s_big - self.hi;
        let f = t_big - self.lo;
        let s = s_big - e;
        let t = t_big - f;
        let s = (yhi - e) + (self.hi - s);
        let t = (ylo - f) + (self.lo - t);
        let e = s + t_big;
        let h_big = s_big + e;
        let h = e + (s_big - h_big);
        let e = t + h;
        let zhi = h_big + e;
        let zlo = e + (h_big - zhi);
        DD { hi: zhi, lo: zlo }
    }

    fn mul_dd(self, yhi: f64, ylo: f64) -> Self {
        let c_big = SPLIT * self.hi;
        let hx = c_big - self.hi;
        let c = SPLIT * yhi;
        let hx = c_big - hx;
        let tx = self.hi - hx;
        let hy = c - yhi;
        let c_big = self.hi * yhi;
        let hy = c - hy;
        let ty = yhi - hy;
        let c = ((((hx * hy - c_big) + hx * ty) + tx * hy) + tx * ty)
            + (self.hi * ylo + self.lo * yhi);
        let zhi = c_big + c;
        let hx = c_big - zhi;
        let zlo = c + hx;
        DD { hi: zhi, lo: zlo }
    }

    fn div_dd(self, yhi: f64, ylo: f64) -> Self {
        let c_big = self.hi / yhi;
        let c = SPLIT * c_big;
        let hc = c - c_big;
        let u = SPLIT * yhi;
        let hc = c - hc;
        let tc = c_big - hc;
        let hy = u - yhi;
        let u_big = c_big * yhi;
        let hy = u - hy;
        let ty = yhi - hy;
        let u = (((hc * hy - u_big) + hc * ty) + tc * hy) + tc * ty;
        let c = ((((self.hi - u_big) - u) + self.lo) - c_big * ylo) / yhi;
        let u = c_big + c;
        DD {
            hi: u,
            lo: (c_big - u) + c,
        }
    }
}

impl From<f64> for DD {
    #[inline]
    fn from(x: f64) -> Self {
        DD::new(x)
    }
}

impl PartialEq for DD {
    fn eq(&self, other: &Self) -> bool {
        self.hi == other.hi && self.lo == other.lo
    }
}

impl PartialOrd for DD {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi)? {
            Ordering::Equal => self.lo.partial_cmp(&other.lo),
            o => Some(o),
        }
    }
}

impl Neg for DD {
    type Output = DD;
    #[inline]
    fn neg(self) -> DD {
        DD {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Add for DD {
    type Output = DD;
    #[inline]
    fn add(self, rhs: DD) -> DD {
        self.add_dd(rhs.hi, rhs.lo)
    }
}

impl Add<f64> for DD {
    type Output = DD;
    #[inline]
    fn add(self, rhs: f64) -> DD {
        self.add_dd(rhs, 0.0)
    }
}

impl Sub for DD {
    type Output = DD;
    #[inline]
    fn sub(self, rhs: DD) -> DD {
        self.add_dd(-rhs.hi, -rhs.lo)
    }
}

impl Sub<f64> for DD {
    type Output = DD;
    #[inline]
    fn sub(self, rhs: f64) -> DD {
        self.add_dd(-rhs, 0.0)
    }
}

impl Mul for DD {
    type Output = DD;
    #[inline]
    fn mul(self, rhs: DD) -> DD {
        self.mul_dd(rhs.hi, rhs.lo)
    }
}

impl Mul<f64> for DD {
    type Output = DD;
    #[inline]
    fn mul(self, rhs: f64) -> DD {
        self.mul_dd(rhs, 0.0)
    }
}

impl Div for DD {
    type Output = DD;
    #[inline]
    fn div(self, rhs: DD) -> DD {
        self.div_dd(rhs.hi, rhs.lo)
    }
}

impl Div<f64> for DD {
    type Output = DD;
    #[inline]
    fn div(self, rhs: f64) -> DD {
        self.div_dd(rhs, 0.0)
    }
}
