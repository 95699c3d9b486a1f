// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time test at the heart of every Mandelbrot renderer.

/// The square of the escape radius.  Once the squared modulus of an
/// orbit exceeds this, the orbit is certain to go to infinity.
pub const ESCAPE_NORM_SQR: f64 = 4.0;

/// What we learned about a point after iterating it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EscapeResult {
    /// The iteration cap was reached without the orbit escaping; the
    /// point is probably in the set.
    Inside,
    /// The orbit escaped at the given iteration (always at least 1).
    Escaped(usize),
}

/// Determines whether `x + iy` (probably) belongs to the Mandelbrot
/// set, or (certainly) does not.
///
/// The orbit is tracked as separate real and imaginary parts rather
/// than through `Complex`, with the squares kept from one step to the
/// next, so that the order of floating point operations is fixed and
/// the answer is reproducible to the bit.  The first test is made
/// against `z(1) = c`, which is why every point outside the escape
/// radius answers `Escaped(1)`.
pub fn evaluate(x: f64, y: f64, max_iter: usize) -> EscapeResult {
    let mut j = 1;
    let (mut real, mut imag) = (x, y);
    let (mut cr, mut ci) = (x * x, y * y);

    while cr + ci <= ESCAPE_NORM_SQR && j < max_iter {
        let next_real = cr - ci + x;
        imag = 2.0 * real * imag + y;
        real = next_real;
        j += 1;
        cr = real * real;
        ci = imag * imag;
    }

    if cr + ci <= ESCAPE_NORM_SQR {
        EscapeResult::Inside
    } else {
        EscapeResult::Escaped(j)
    }
}
