//! Transverse Mercator conversion between UTM zone 32N (ETRS89, EPSG:25832)
//! and geographic WGS84 coordinates, using Krüger's series to sixth order in
//! the third flattening. ETRS89 and WGS84 are treated as coincident; the
//! difference is well below a metre over Denmark.

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    GRS80_FLATTENING, GRS80_SEMI_MAJOR_AXIS, MAX_EASTING, MAX_NORTHING, MIN_EASTING,
    MIN_NORTHING, UTM32_CENTRAL_MERIDIAN, UTM_FALSE_EASTING, UTM_SCALE_FACTOR,
};

const MAX_LATITUDE_ITERATIONS: usize = 20;
const LATITUDE_TOLERANCE: f64 = 1e-12;

/// Precomputed constants for one transverse Mercator zone.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    central_meridian: f64,
    scale_factor: f64,
    false_easting: f64,
    eccentricity: f64,
    rectifying_radius: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl TransverseMercator {
    pub fn new(
        semi_major_axis: f64,
        flattening: f64,
        central_meridian_deg: f64,
        scale_factor: f64,
        false_easting: f64,
    ) -> Self {
        let n = flattening / (2.0 - flattening);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let rectifying_radius =
            semi_major_axis / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        Self {
            central_meridian: central_meridian_deg.to_radians(),
            scale_factor,
            false_easting,
            eccentricity: (flattening * (2.0 - flattening)).sqrt(),
            rectifying_radius,
            alpha,
            beta,
        }
    }

    /// UTM zone 32N on the GRS80 ellipsoid (EPSG:25832).
    pub fn utm32n() -> Self {
        Self::new(
            GRS80_SEMI_MAJOR_AXIS,
            GRS80_FLATTENING,
            UTM32_CENTRAL_MERIDIAN,
            UTM_SCALE_FACTOR,
            UTM_FALSE_EASTING,
        )
    }

    /// Planar (easting, northing) in metres to (longitude, latitude) in degrees.
    pub fn to_geographic(&self, easting: f64, northing: f64) -> Result<(f64, f64)> {
        validate_planar(easting, northing)?;

        let k0_a = self.scale_factor * self.rectifying_radius;
        let xi = northing / k0_a;
        let eta = (easting - self.false_easting) / k0_a;

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, beta) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_prime -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let tau_prime = xi_prime.sin() / eta_prime.sinh().hypot(xi_prime.cos());
        let lambda = eta_prime.sinh().atan2(xi_prime.cos());
        let tau = self.conformal_to_geodetic(tau_prime);

        let longitude = (self.central_meridian + lambda).to_degrees();
        let latitude = tau.atan().to_degrees();

        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(ProcessingError::Projection {
                x: easting,
                y: northing,
                reason: "transform produced a non-finite result".to_string(),
            });
        }

        Ok((longitude, latitude))
    }

    /// (longitude, latitude) in degrees to planar (easting, northing) in metres.
    pub fn to_planar(&self, longitude: f64, latitude: f64) -> Result<(f64, f64)> {
        if !longitude.is_finite() || !latitude.is_finite() || latitude.abs() >= 90.0 {
            return Err(ProcessingError::Projection {
                x: longitude,
                y: latitude,
                reason: "geographic coordinate outside the projectable range".to_string(),
            });
        }

        let phi = latitude.to_radians();
        let lambda = longitude.to_radians() - self.central_meridian;

        let tau = phi.tan();
        let tau_prime = self.geodetic_to_conformal(tau);

        let xi_prime = tau_prime.atan2(lambda.cos());
        let eta_prime = (lambda.sin() / tau_prime.hypot(lambda.cos())).asinh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += alpha * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        let k0_a = self.scale_factor * self.rectifying_radius;
        Ok((self.false_easting + k0_a * eta, k0_a * xi))
    }

    fn geodetic_to_conformal(&self, tau: f64) -> f64 {
        let e = self.eccentricity;
        let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt()
    }

    /// Newton iteration for tan(latitude) from tan(conformal latitude).
    fn conformal_to_geodetic(&self, tau_prime: f64) -> f64 {
        let e2 = self.eccentricity * self.eccentricity;
        let mut tau = tau_prime;

        for _ in 0..MAX_LATITUDE_ITERATIONS {
            let tau_i_prime = self.geodetic_to_conformal(tau);
            let delta = (tau_prime - tau_i_prime) / (1.0 + tau_i_prime * tau_i_prime).sqrt()
                * (1.0 + (1.0 - e2) * tau * tau)
                / ((1.0 - e2) * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < LATITUDE_TOLERANCE {
                break;
            }
        }

        tau
    }
}

impl Default for TransverseMercator {
    fn default() -> Self {
        Self::utm32n()
    }
}

fn validate_planar(easting: f64, northing: f64) -> Result<()> {
    if !easting.is_finite() || !northing.is_finite() {
        return Err(ProcessingError::Projection {
            x: easting,
            y: northing,
            reason: "coordinate is not a finite number".to_string(),
        });
    }

    if !(MIN_EASTING..=MAX_EASTING).contains(&easting) {
        return Err(ProcessingError::Projection {
            x: easting,
            y: northing,
            reason: format!("easting outside [{}, {}]", MIN_EASTING, MAX_EASTING),
        });
    }

    if !(MIN_NORTHING..=MAX_NORTHING).contains(&northing) {
        return Err(ProcessingError::Projection {
            x: easting,
            y: northing,
            reason: format!("northing outside [{}, {}]", MIN_NORTHING, MAX_NORTHING),
        });
    }

    Ok(())
}
