//! Sensor arc.

use holo_core::error::{ConfigurationError, Result};
use holo_core::geometry::*;
use holo_core::holo::*;

/// A camera placement on the viewing arc.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorPlacement {
    /// Name of the sensor entity; used as the render handle.
    pub name: String,

    /// Signed azimuth (degrees) from boresight.
    pub azimuth: Float,

    /// Camera-to-world transformation.
    pub world_transform: Transform,
}

/// Returns the name of the i-th sensor (0-based).
///
/// * `i` - Sensor index.
pub fn sensor_name(i: usize) -> String {
    format!("sensor{}", i + 1)
}

/// Spread `count` sensors evenly over `total_angle` degrees centered on
/// boresight. Every sensor looks from `origin` at `target`; its azimuth is
/// applied as a rotation about `up` after the look-at transformation.
///
/// * `count`       - Number of sensors.
/// * `total_angle` - Total angle (degrees) spanned by the arc.
/// * `target`      - Point looked at.
/// * `origin`      - Camera position before rotation.
/// * `up`          - Up direction and rotation axis.
pub fn build_arc(
    count: usize,
    total_angle: Float,
    target: &Point3f,
    origin: &Point3f,
    up: &Vector3f,
) -> Result<Vec<SensorPlacement>> {
    if count == 0 {
        return Err(ConfigurationError::EmptySensorSet.into());
    }

    let look_at = Transform::look_at(origin, target, up);
    let step = if count > 1 {
        total_angle / (count - 1) as Float
    } else {
        0.0
    };
    let start = if count > 1 { -0.5 * total_angle } else { 0.0 };

    Ok((0..count)
        .map(|i| {
            let azimuth = start + i as Float * step;
            SensorPlacement {
                name: sensor_name(i),
                azimuth,
                world_transform: Transform::rotate(azimuth, up) * look_at,
            }
        })
        .collect())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use holo_core::error::Error;
    use float_cmp::approx_eq;

    fn arc(count: usize, total_angle: Float) -> Result<Vec<SensorPlacement>> {
        build_arc(
            count,
            total_angle,
            &point3(0.0, 0.0, 0.0),
            &point3(15.0, 0.0, 0.0),
            &vector3(0.0, 0.0, 1.0),
        )
    }

    fn camera_position(p: &SensorPlacement) -> Point3f {
        p.world_transform.transform_point(&point3(0.0, 0.0, 0.0))
    }

    #[test]
    fn single_sensor_is_at_boresight() {
        let placements = arc(1, 120.0).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].azimuth, 0.0);
        assert_eq!(placements[0].name, "sensor1");
        let p = camera_position(&placements[0]);
        assert!(approx_eq!(Float, p.x, 15.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, p.y, 0.0, epsilon = 1e-4));
    }

    #[test]
    fn three_sensors_span_the_arc() {
        let placements = arc(3, 120.0).unwrap();
        let azimuths: Vec<Float> = placements.iter().map(|p| p.azimuth).collect();
        assert_eq!(azimuths, vec![-60.0, 0.0, 60.0]);
        let names: Vec<&str> = placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["sensor1", "sensor2", "sensor3"]);
    }

    #[test]
    fn rotated_sensors_keep_distance_and_look_at_target() {
        for p in arc(5, 120.0).unwrap() {
            let position = camera_position(&p);
            assert!(approx_eq!(
                Float,
                position.distance(&point3(0.0, 0.0, 0.0)),
                15.0,
                epsilon = 1e-3
            ));
            assert!(approx_eq!(Float, position.z, 0.0, epsilon = 1e-4));

            // The camera's +z axis points at the target.
            let dir = p.world_transform.transform_vector(&vector3(0.0, 0.0, 1.0));
            let to_target = (point3(0.0, 0.0, 0.0) - position).normalize();
            assert!(approx_eq!(Float, dir.dot(&to_target), 1.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn positive_azimuth_rotates_counter_clockwise() {
        let placements = arc(3, 120.0).unwrap();
        let p = camera_position(&placements[2]);
        assert!(approx_eq!(Float, p.x, 7.5, epsilon = 1e-3));
        assert!(approx_eq!(Float, p.y, 15.0 * (60.0 as Float).to_radians().sin(), epsilon = 1e-3));
    }

    #[test]
    fn zero_sensors_is_an_error() {
        assert_eq!(
            arc(0, 120.0),
            Err(Error::Configuration(ConfigurationError::EmptySensorSet))
        );
    }
}
