//! 2D affine matrices in the canvas convention.
//!
//! A matrix maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`, the same
//! layout as a 2D canvas `setTransform(a, b, c, d, e, f)`. Composition with
//! [`Affine::then`] applies `self` first.

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Affine {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Affine {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `degrees`, clockwise on screen (y axis down).
    ///
    /// Quarter turns use exact sine/cosine values so that 90° steps map
    /// pixel centers onto pixel centers without drift.
    pub fn rotate_degrees(degrees: f64) -> Self {
        let (sin, cos) = if degrees.fract() == 0.0 && (degrees as i64) % 90 == 0 {
            match (degrees as i64).rem_euclid(360) {
                0 => (0.0, 1.0),
                90 => (1.0, 0.0),
                180 => (0.0, -1.0),
                _ => (-1.0, 0.0),
            }
        } else {
            degrees.to_radians().sin_cos()
        };
        Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse matrix, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() < 1e-12 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// True when the matrix only permutes/mirrors axes and translates by
    /// whole or half pixels, i.e. nearest sampling is lossless.
    pub fn is_axis_aligned_unit(&self) -> bool {
        let unit = |v: f64| (v.abs() - 1.0).abs() < 1e-9;
        let zero = |v: f64| v.abs() < 1e-9;
        (unit(self.a) && unit(self.d) && zero(self.b) && zero(self.c))
            || (unit(self.b) && unit(self.c) && zero(self.a) && zero(self.d))
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}
