/// 4x4 transform matrix stored in column-major order
///
/// Element `[i]` lives at `i = col * 4 + row`, the layout graphics APIs expect
/// for matrix uniforms. Mutating operations compose with the current state and
/// return `&mut Self` so they can be chained.
use core::fmt;
use core::ops;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::transform::EPSILON;
use crate::vector::{Vector3, Vector4};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Matrix4 {
    elements: [f32; 16],
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4 {
        elements: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// A new identity matrix.
    pub fn new() -> Self {
        Self::IDENTITY
    }

    /// Resets to the identity matrix.
    pub fn identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Builds a right-handed view matrix for a camera at `eye` looking at `center`.
    ///
    /// Coincident `eye`/`center` (within [`EPSILON`] per component) yields the
    /// identity. A basis axis whose cross product has zero length is zeroed
    /// instead of normalized.
    pub fn look_at(&mut self, eye: &Vector3, center: &Vector3, up: &Vector3) -> &mut Self {
        if (eye.x - center.x).abs() < EPSILON
            && (eye.y - center.y).abs() < EPSILON
            && (eye.z - center.z).abs() < EPSILON
        {
            trace!("look_at: eye and center coincide, using identity");
            return self.identity();
        }

        let mut z = *eye - *center;
        let len = z.magnitude();
        z.scale(1.0 / len);

        let x = normalize_or_zero(up.cross(&z));
        let y = normalize_or_zero(z.cross(&x));

        self.elements = [
            x.x, y.x, z.x, 0.0, //
            x.y, y.y, z.y, 0.0, //
            x.z, y.z, z.z, 0.0, //
            -x.dot(eye),
            -y.dot(eye),
            -z.dot(eye),
            1.0,
        ];
        self
    }

    /// Rotates the upper-left 3x3 block by `rad` around `axis` (need not be
    /// unit length). A no-op when the axis is shorter than [`EPSILON`].
    pub fn rotate(&mut self, rad: f32, axis: &Vector3) -> &mut Self {
        let len = axis.magnitude();
        if len < EPSILON {
            trace!("rotate: axis too short, ignoring");
            return self;
        }

        let (x, y, z) = (axis.x / len, axis.y / len, axis.z / len);
        let (s, c) = rad.sin_cos();
        let t = 1.0 - c;

        let a = self.elements;

        let b00 = x * x * t + c;
        let b01 = y * x * t + z * s;
        let b02 = z * x * t - y * s;
        let b10 = x * y * t - z * s;
        let b11 = y * y * t + c;
        let b12 = z * y * t + x * s;
        let b20 = x * z * t + y * s;
        let b21 = y * z * t - x * s;
        let b22 = z * z * t + c;

        for row in 0..4 {
            self.elements[row] = a[row] * b00 + a[4 + row] * b01 + a[8 + row] * b02;
            self.elements[4 + row] = a[row] * b10 + a[4 + row] * b11 + a[8 + row] * b12;
            self.elements[8 + row] = a[row] * b20 + a[4 + row] * b21 + a[8 + row] * b22;
        }
        self
    }

    pub fn rotate_x(&mut self, rad: f32) -> &mut Self {
        let (s, c) = rad.sin_cos();
        for row in 0..4 {
            let a1 = self.elements[4 + row];
            let a2 = self.elements[8 + row];
            self.elements[4 + row] = a1 * c + a2 * s;
            self.elements[8 + row] = a2 * c - a1 * s;
        }
        self
    }

    pub fn rotate_y(&mut self, rad: f32) -> &mut Self {
        let (s, c) = rad.sin_cos();
        for row in 0..4 {
            let a0 = self.elements[row];
            let a2 = self.elements[8 + row];
            self.elements[row] = a0 * c - a2 * s;
            self.elements[8 + row] = a0 * s + a2 * c;
        }
        self
    }

    pub fn rotate_z(&mut self, rad: f32) -> &mut Self {
        let (s, c) = rad.sin_cos();
        for row in 0..4 {
            let a0 = self.elements[row];
            let a1 = self.elements[4 + row];
            self.elements[row] = a0 * c + a1 * s;
            self.elements[4 + row] = a1 * c - a0 * s;
        }
        self
    }

    /// Scales the three basis columns by `v.x`, `v.y`, `v.z`. Translation is kept.
    pub fn scale(&mut self, v: &Vector3) -> &mut Self {
        for row in 0..4 {
            self.elements[row] *= v.x;
            self.elements[4 + row] *= v.y;
            self.elements[8 + row] *= v.z;
        }
        self
    }

    /// Translates along the matrix's own axes: `t' = t + basis * v`.
    pub fn translate(&mut self, v: &Vector3) -> &mut Self {
        for row in 0..4 {
            self.elements[12 + row] = self.elements[row] * v.x
                + self.elements[4 + row] * v.y
                + self.elements[8 + row] * v.z
                + self.elements[12 + row];
        }
        self
    }

    /// Flat product of the two element arrays,
    /// `out[i*4+j] = sum_k self[i*4+k] * other[k*4+j]`, written back into `self`.
    ///
    /// With column vectors this is the mathematical product `other * self`:
    /// the result applies `self` first and `other` second. Use the `*`
    /// operator for `self * other`.
    pub fn multiply(&mut self, other: &Matrix4) -> &mut Self {
        let a = self.elements;
        let b = other.elements;
        for i in 0..4 {
            for j in 0..4 {
                self.elements[i * 4 + j] = a[i * 4] * b[j]
                    + a[i * 4 + 1] * b[4 + j]
                    + a[i * 4 + 2] * b[8 + j]
                    + a[i * 4 + 3] * b[12 + j];
            }
        }
        self
    }

    /// Cofactor inverse. Fails with [`Error::SingularMatrix`] and leaves the
    /// matrix unchanged when the determinant is exactly zero.
    pub fn invert(&mut self) -> Result<&mut Self> {
        let m = &self.elements;
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14]
            + m[13] * m[6] * m[11]
            - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14]
            - m[12] * m[6] * m[11]
            + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13]
            + m[12] * m[5] * m[11]
            - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13]
            - m[12] * m[5] * m[10]
            + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14]
            - m[13] * m[2] * m[11]
            + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14]
            + m[12] * m[2] * m[11]
            - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13]
            - m[12] * m[1] * m[11]
            + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13]
            + m[12] * m[1] * m[10]
            - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14]
            + m[13] * m[2] * m[7]
            - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14]
            - m[12] * m[2] * m[7]
            + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13]
            + m[12] * m[1] * m[7]
            - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13]
            - m[12] * m[1] * m[6]
            + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10]
            - m[9] * m[2] * m[7]
            + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10]
            + m[8] * m[2] * m[7]
            - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9]
            - m[8] * m[1] * m[7]
            + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9]
            + m[8] * m[1] * m[6]
            - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det == 0.0 {
            return Err(Error::SingularMatrix);
        }

        let inv_det = 1.0 / det;
        for (dst, src) in self.elements.iter_mut().zip(inv.iter()) {
            *dst = src * inv_det;
        }
        Ok(self)
    }

    /// In-place transpose.
    pub fn transpose(&mut self) -> &mut Self {
        let m = &mut self.elements;
        m.swap(1, 4);
        m.swap(2, 8);
        m.swap(6, 9);
        m.swap(3, 12);
        m.swap(7, 13);
        m.swap(11, 14);
        self
    }

    /// Cofactor expansion along elements 0..4.
    pub fn determinant(&self) -> f32 {
        let [m00, m01, m02, m03, m10, m11, m12, m13, m20, m21, m22, m23, m30, m31, m32, m33] =
            self.elements;

        m00 * (m11 * (m22 * m33 - m23 * m32) - m12 * (m21 * m33 - m23 * m31)
            + m13 * (m21 * m32 - m22 * m31))
            - m01
                * (m10 * (m22 * m33 - m23 * m32) - m12 * (m20 * m33 - m23 * m30)
                    + m13 * (m20 * m32 - m22 * m30))
            + m02
                * (m10 * (m21 * m33 - m23 * m31) - m11 * (m20 * m33 - m23 * m30)
                    + m13 * (m20 * m31 - m21 * m30))
            - m03
                * (m10 * (m21 * m32 - m22 * m31) - m11 * (m20 * m32 - m22 * m30)
                    + m12 * (m20 * m31 - m21 * m30))
    }

    /// Overwrites all 16 elements, column-major.
    pub fn from_array(&mut self, array: &[f32; 16]) -> &mut Self {
        self.elements = *array;
        self
    }

    /// Like [`Matrix4::from_array`], but checks the slice holds exactly 16 values.
    pub fn from_slice(&mut self, values: &[f32]) -> Result<&mut Self> {
        let array: [f32; 16] = values.try_into().map_err(|_| {
            Error::invalid(format!("matrix needs 16 values, got {}", values.len()))
        })?;
        Ok(self.from_array(&array))
    }

    pub fn to_array(&self) -> [f32; 16] {
        self.elements
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.elements
    }

    /// Matrix times column vector.
    pub fn transform_vector4(&self, v: &Vector4) -> Vector4 {
        let m = &self.elements;
        Vector4::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12] * v.w,
            m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13] * v.w,
            m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14] * v.w,
            m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15] * v.w,
        )
    }

    /// Transforms a point (w = 1) without the perspective divide.
    pub fn transform_point(&self, p: &Vector3) -> Vector4 {
        self.transform_vector4(&p.extend(1.0))
    }
}

fn normalize_or_zero(mut v: Vector3) -> Vector3 {
    let len = v.magnitude();
    if len == 0.0 {
        trace!("look_at: degenerate basis axis, zeroing");
        return Vector3::ZERO;
    }
    v.scale(1.0 / len);
    v
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ops::Index<usize> for Matrix4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.elements[index]
    }
}

impl ops::IndexMut<usize> for Matrix4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.elements[index]
    }
}

/// Column-major mathematical product `self * rhs`.
impl ops::Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        let a = &self.elements;
        let b = &rhs.elements;
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = a[row] * b[col * 4]
                    + a[4 + row] * b[col * 4 + 1]
                    + a[8 + row] * b[col * 4 + 2]
                    + a[12 + row] * b[col * 4 + 3];
            }
        }
        Matrix4 { elements: out }
    }
}

impl ops::Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Vector4 {
        self.transform_vector4(&rhs)
    }
}

impl From<[f32; 16]> for Matrix4 {
    fn from(elements: [f32; 16]) -> Self {
        Matrix4 { elements }
    }
}

impl From<Matrix4> for nalgebra::Matrix4<f32> {
    fn from(m: Matrix4) -> Self {
        nalgebra::Matrix4::from_column_slice(&m.elements)
    }
}

impl From<nalgebra::Matrix4<f32>> for Matrix4 {
    fn from(m: nalgebra::Matrix4<f32>) -> Self {
        let mut elements = [0.0f32; 16];
        elements.copy_from_slice(m.as_slice());
        Matrix4 { elements }
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.elements;
        for row in 0..4 {
            writeln!(
                f,
                "[{}, {}, {}, {}]",
                m[row],
                m[4 + row],
                m[8 + row],
                m[12 + row]
            )?;
        }
        Ok(())
    }
}
