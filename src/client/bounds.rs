/// Axis-aligned lat/lng box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn point(lat: f64, lng: f64) -> Self {
        Self {
            south: lat,
            west: lng,
            north: lat,
            east: lng,
        }
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lng)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }
}

/// Running bounding box of every valid point seen during a load. It only grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsAccumulator {
    bounds: Option<Bounds>,
}

impl BoundsAccumulator {
    pub fn extend(&mut self, lat: f64, lng: f64) {
        let point = Bounds::point(lat, lng);
        self.bounds = Some(match self.bounds {
            Some(current) => current.union(&point),
            None => point,
        });
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_only_grows() {
        let mut acc = BoundsAccumulator::default();
        assert_eq!(acc.bounds(), None);

        acc.extend(8.0, -13.0);
        acc.extend(9.0, -12.0);
        let wide = acc.bounds().unwrap();

        acc.extend(8.5, -12.5);
        assert_eq!(acc.bounds().unwrap(), wide);
        assert!(wide.contains(8.5, -12.5));
        assert_eq!(wide.south, 8.0);
        assert_eq!(wide.east, -12.0);
    }
}
