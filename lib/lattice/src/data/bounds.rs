use nalgebra::{Point3, Vector3};

/// Axis-Aligned Bounding Box
///
/// Once finalized, `mins[i] <= maxs[i]` for each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub mins: Point3<f32>,
    pub maxs: Point3<f32>,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            mins: Point3::origin(),
            maxs: Point3::origin(),
        }
    }
}

impl BoundingBox {
    #[inline]
    pub fn new(mins: Point3<f32>, maxs: Point3<f32>) -> Self {
        Self { mins, maxs }
    }

    /// Construct the smallest [BoundingBox] containing every point in `points`.
    ///
    /// Generators whose output isn't determined by their parameters should use this rather than
    /// deriving a box from their inputs. Returns `None` if `points` is empty.
    pub fn from_points<'p>(points: impl IntoIterator<Item = &'p Point3<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self::new(first, first), |b, p| Self {
            mins: b.mins.inf(p),
            maxs: b.maxs.sup(p),
        }))
    }

    /// Whether `mins` is component-wise less than or equal to `maxs`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        let Self { mins: i, maxs: a } = self;
        i.x <= a.x && i.y <= a.y && i.z <= a.z
    }

    #[inline]
    pub fn contains(&self, p: &Point3<f32>) -> bool {
        let Self { mins: i, maxs: a } = self;
        (p.x >= i.x && p.y >= i.y && p.z >= i.z) && (p.x <= a.x && p.y <= a.y && p.z <= a.z)
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.mins, &self.maxs)
    }

    /// The length of each edge of the box.
    #[inline]
    pub fn extent(&self) -> Vector3<f32> {
        self.maxs - self.mins
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::point;

    use super::BoundingBox;

    #[test]
    fn from_points_encloses_all() {
        let points = [
            point![1.0, -2.0, 0.5],
            point![-3.0, 4.0, 0.0],
            point![0.0, 0.0, 2.0],
        ];
        let b = BoundingBox::from_points(&points).unwrap();
        assert_eq!(b.mins, point![-3.0, -2.0, 0.0]);
        assert_eq!(b.maxs, point![1.0, 4.0, 2.0]);
        assert!(b.is_valid());
        assert!(points.iter().all(|p| b.contains(p)));
    }

    #[test]
    fn from_no_points() {
        assert!(BoundingBox::from_points(&[] as &[nalgebra::Point3<f32>]).is_none());
    }

    #[test]
    fn inverted() {
        let b = BoundingBox::new(point![1.0, 0.0, 0.0], point![0.0, 1.0, 1.0]);
        assert!(!b.is_valid());
        assert_eq!(b.center(), point![0.5, 0.5, 0.5]);
    }
}
