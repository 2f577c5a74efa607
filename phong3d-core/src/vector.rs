/// Fixed-size float vectors with a fluent, in-place API
///
/// Every arithmetic method mutates `self` and returns it so calls can be
/// chained. `cross` is the exception and allocates a new vector. The
/// `std::ops` operators are the pure counterparts and return new values.
use core::fmt;
use core::ops;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

macro_rules! vector_impl {
    ($v: ident, $n: literal, $($e: ident : $i: literal),*) => {
        #[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
        #[repr(C)]
        pub struct $v {
            $( pub $e: f32, )*
        }

        impl $v {
            pub const ZERO: $v = $v { $( $e: 0.0, )* };

            #[inline]
            pub const fn new($( $e: f32, )*) -> $v {
                $v { $( $e, )* }
            }

            /// Overwrites every component.
            #[inline]
            pub fn set(&mut self, $( $e: f32, )*) -> &mut Self {
                $( self.$e = $e; )*
                self
            }

            #[inline]
            pub fn from_array(a: [f32; $n]) -> $v {
                $v { $( $e: a[$i], )* }
            }

            #[inline]
            pub fn to_array(self) -> [f32; $n] {
                [$( self.$e, )*]
            }

            /// Euclidean norm.
            #[inline]
            pub fn magnitude(&self) -> f32 {
                ($( self.$e * self.$e + )* 0.0).sqrt()
            }

            /// Scales to unit length. A zero vector is left unchanged.
            pub fn normalize(&mut self) -> &mut Self {
                let mag = self.magnitude();
                if mag > 0.0 {
                    $( self.$e /= mag; )*
                }
                self
            }

            #[inline]
            pub fn add(&mut self, other: &$v) -> &mut Self {
                $( self.$e += other.$e; )*
                self
            }

            #[inline]
            pub fn subtract(&mut self, other: &$v) -> &mut Self {
                $( self.$e -= other.$e; )*
                self
            }

            #[inline]
            pub fn scale(&mut self, scalar: f32) -> &mut Self {
                $( self.$e *= scalar; )*
                self
            }

            #[inline]
            pub fn dot(&self, other: &$v) -> f32 {
                $( self.$e * other.$e + )* 0.0
            }

            /// Componentwise division. Fails with [`Error::DivideByZero`]
            /// before touching any component when `scalar` is zero.
            pub fn divide(&mut self, scalar: f32) -> Result<&mut Self> {
                if scalar == 0.0 {
                    return Err(Error::DivideByZero);
                }
                $( self.$e /= scalar; )*
                Ok(self)
            }
        }

        impl ops::Index<usize> for $v {
            type Output = f32;

            fn index(&self, index: usize) -> &f32 {
                match index {
                    $( $i => &self.$e, )*
                    _ => panic!("{} index out of range: {}", stringify!($v), index),
                }
            }
        }

        impl ops::IndexMut<usize> for $v {
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                match index {
                    $( $i => &mut self.$e, )*
                    _ => panic!("{} index out of range: {}", stringify!($v), index),
                }
            }
        }

        impl From<[f32; $n]> for $v {
            fn from(a: [f32; $n]) -> $v {
                $v::from_array(a)
            }
        }

        impl From<$v> for [f32; $n] {
            fn from(v: $v) -> [f32; $n] {
                v.to_array()
            }
        }

        impl ops::Add for $v {
            type Output = $v;

            #[inline]
            fn add(self, rhs: $v) -> $v {
                $v { $( $e: self.$e + rhs.$e, )* }
            }
        }

        impl ops::Sub for $v {
            type Output = $v;

            #[inline]
            fn sub(self, rhs: $v) -> $v {
                $v { $( $e: self.$e - rhs.$e, )* }
            }
        }

        impl ops::Mul<f32> for $v {
            type Output = $v;

            #[inline]
            fn mul(self, rhs: f32) -> $v {
                $v { $( $e: self.$e * rhs, )* }
            }
        }

        impl ops::Neg for $v {
            type Output = $v;

            #[inline]
            fn neg(self) -> $v {
                $v { $( $e: -self.$e, )* }
            }
        }

        impl fmt::Display for $v {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                let parts: Vec<String> = vec![$(
                    format!("{:.prec$}", self.$e, prec = f.precision().unwrap_or(3)),
                )*];
                write!(f, "{}({})", stringify!($v), parts.join(", "))
            }
        }
    };
}

vector_impl!(Vector2, 2, x: 0, y: 1);
vector_impl!(Vector3, 3, x: 0, y: 1, z: 2);
vector_impl!(Vector4, 4, x: 0, y: 1, z: 2, w: 3);

impl Vector3 {
    /// Right-handed cross product. Neither operand is modified.
    #[inline]
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[inline]
    pub fn extend(self, w: f32) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }
}

impl Vector4 {
    #[inline]
    pub fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        nalgebra::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<nalgebra::Vector3<f32>> for Vector3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}
