//! A ground-based interferometer: geometry, antenna response and observed data.
//!
//! Geometry attributes are stored privately (angles in radians) and changed only
//! through setters, which notify the `GeometryCache`. The derived `vertex`, arm
//! vectors and detector tensor are computed on first read and then reused until a
//! setter touches one of their dependencies.

use std::f64::consts::TAU;

use nalgebra::{Matrix3, Vector3};
use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::detector::cache::{Derived, GeometryCache, GeometryInput};
use crate::detector::geometry::{LocalFrame, detector_tensor, vertex_position_geocentric};
use crate::detector::response::{antenna_response_for_tensor, time_delay_geocentric};
use crate::domain::{Arm, DetectorGeometry, Parameters, PolarizationMode, Polarizations, SkyPosition};
use crate::error::DetectorError;
use crate::math::frequency_series;
use crate::noise::PowerSpectralDensity;
use crate::waveform::WaveformModel;

/// How `Interferometer::set_data` obtains its strain.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Caller-provided frequency-domain strain on the grid implied by the
    /// sampling frequency and duration.
    FrequencyDomainStrain(Vec<Complex64>),
    /// A noise realisation drawn from the detector's own PSD. `None` seeds from OS
    /// entropy.
    NoiseRealisation { seed: Option<u64> },
}

impl DataSource {
    /// Pick a source from the two optional inputs, explicit strain first.
    pub fn select(
        frequency_domain_strain: Option<Vec<Complex64>>,
        from_power_spectral_density: bool,
        seed: Option<u64>,
    ) -> Result<Self, DetectorError> {
        match (frequency_domain_strain, from_power_spectral_density) {
            (Some(strain), _) => Ok(DataSource::FrequencyDomainStrain(strain)),
            (None, true) => Ok(DataSource::NoiseRealisation { seed }),
            (None, false) => Err(DetectorError::NoDataSource),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Interferometer {
    name: String,
    length: f64,
    latitude: f64,
    longitude: f64,
    elevation: f64,
    xarm_azimuth: f64,
    yarm_azimuth: f64,
    xarm_tilt: f64,
    yarm_tilt: f64,
    power_spectral_density: PowerSpectralDensity,
    data: Vec<Complex64>,
    frequency_array: Vec<f64>,
    cache: GeometryCache,
}

impl Interferometer {
    pub fn new(name: impl Into<String>, geometry: DetectorGeometry, power_spectral_density: PowerSpectralDensity) -> Self {
        Self {
            name: name.into(),
            length: geometry.length,
            latitude: geometry.latitude.to_radians(),
            longitude: geometry.longitude.to_radians(),
            elevation: geometry.elevation,
            xarm_azimuth: geometry.xarm_azimuth.to_radians(),
            yarm_azimuth: geometry.yarm_azimuth.to_radians(),
            xarm_tilt: geometry.xarm_tilt,
            yarm_tilt: geometry.yarm_tilt,
            power_spectral_density,
            data: Vec::new(),
            frequency_array: Vec::new(),
            cache: GeometryCache::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arm length in kilometres.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn geometry(&self) -> DetectorGeometry {
        DetectorGeometry {
            length: self.length,
            latitude: self.latitude(),
            longitude: self.longitude(),
            elevation: self.elevation,
            xarm_azimuth: self.xarm_azimuth(),
            yarm_azimuth: self.yarm_azimuth(),
            xarm_tilt: self.xarm_tilt,
            yarm_tilt: self.yarm_tilt,
        }
    }

    /// Latitude North in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude.to_degrees()
    }

    /// Longitude East in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude.to_degrees()
    }

    /// Height above the ellipsoid in metres.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// X-arm azimuth in degrees North of East.
    pub fn xarm_azimuth(&self) -> f64 {
        self.xarm_azimuth.to_degrees()
    }

    /// Y-arm azimuth in degrees North of East.
    pub fn yarm_azimuth(&self) -> f64 {
        self.yarm_azimuth.to_degrees()
    }

    /// X-arm tilt above the horizontal, radians.
    pub fn xarm_tilt(&self) -> f64 {
        self.xarm_tilt
    }

    /// Y-arm tilt above the horizontal, radians.
    pub fn yarm_tilt(&self) -> f64 {
        self.yarm_tilt
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    pub fn set_latitude(&mut self, degrees: f64) {
        self.update(GeometryInput::Latitude, degrees.to_radians());
    }

    pub fn set_longitude(&mut self, degrees: f64) {
        self.update(GeometryInput::Longitude, degrees.to_radians());
    }

    pub fn set_elevation(&mut self, metres: f64) {
        self.update(GeometryInput::Elevation, metres);
    }

    pub fn set_xarm_azimuth(&mut self, degrees: f64) {
        self.update(GeometryInput::XarmAzimuth, degrees.to_radians());
    }

    pub fn set_yarm_azimuth(&mut self, degrees: f64) {
        self.update(GeometryInput::YarmAzimuth, degrees.to_radians());
    }

    pub fn set_xarm_tilt(&mut self, radians: f64) {
        self.update(GeometryInput::XarmTilt, radians);
    }

    pub fn set_yarm_tilt(&mut self, radians: f64) {
        self.update(GeometryInput::YarmTilt, radians);
    }

    fn update(&mut self, input: GeometryInput, value: f64) {
        let field = match input {
            GeometryInput::Latitude => &mut self.latitude,
            GeometryInput::Longitude => &mut self.longitude,
            GeometryInput::Elevation => &mut self.elevation,
            GeometryInput::XarmAzimuth => &mut self.xarm_azimuth,
            GeometryInput::YarmAzimuth => &mut self.yarm_azimuth,
            GeometryInput::XarmTilt => &mut self.xarm_tilt,
            GeometryInput::YarmTilt => &mut self.yarm_tilt,
        };
        *field = value;
        self.cache.invalidate(input);
    }

    /// Whether `derived` is currently cached (clean).
    pub fn is_cached(&self, derived: Derived) -> bool {
        self.cache.is_clean(derived)
    }

    /// Geocentric position of the vertex, metres.
    pub fn vertex(&self) -> Vector3<f64> {
        self.cache.vertex(|| self.vertex_position_geocentric())
    }

    pub fn x(&self) -> Vector3<f64> {
        self.cache.arm(Arm::X, || self.unit_vector_along_arm(Arm::X))
    }

    pub fn y(&self) -> Vector3<f64> {
        self.cache.arm(Arm::Y, || self.unit_vector_along_arm(Arm::Y))
    }

    /// Detector tensor `½(x⊗x − y⊗y)`, see Eq. B6 of gr-qc/0008066.
    pub fn detector_tensor(&self) -> Matrix3<f64> {
        // A clean tensor implies clean arms, so these reads never dirty it.
        let x = self.x();
        let y = self.y();
        self.cache.tensor(|| detector_tensor(&x, &y))
    }

    /// Unit vector along `arm` in Earth-fixed Cartesian coordinates
    /// (Eqs. B14-B17 of gr-qc/0008066). Always recomputed; `x()`/`y()` cache it.
    pub fn unit_vector_along_arm(&self, arm: Arm) -> Vector3<f64> {
        let frame = LocalFrame::at(self.latitude, self.longitude);
        match arm {
            Arm::X => frame.direction(self.xarm_azimuth, self.xarm_tilt),
            Arm::Y => frame.direction(self.yarm_azimuth, self.yarm_tilt),
        }
    }

    /// Like `unit_vector_along_arm`, for an arm named `"x"` or `"y"`.
    pub fn unit_vector_along_named_arm(&self, arm: &str) -> Result<Vector3<f64>, DetectorError> {
        Ok(self.unit_vector_along_arm(arm.parse()?))
    }

    /// Vertex position computed from the current geometry (uncached).
    pub fn vertex_position_geocentric(&self) -> Vector3<f64> {
        vertex_position_geocentric(self.latitude, self.longitude, self.elevation)
    }

    /// Antenna response to `mode` for a source at `(ra, dec)`, GPS `time` and
    /// polarization angle `psi`. See Nishizawa et al. (2009), arXiv:0903.0528.
    pub fn antenna_response(&self, ra: f64, dec: f64, time: f64, psi: f64, mode: PolarizationMode) -> f64 {
        antenna_response_for_tensor(&self.detector_tensor(), ra, dec, time, psi, mode)
    }

    /// Arrival time at this detector minus arrival time at the geocenter, seconds.
    pub fn time_delay_from_geocenter(&self, ra: f64, dec: f64, time: f64) -> f64 {
        time_delay_geocentric(&self.vertex(), &Vector3::zeros(), ra, dec, time)
    }

    /// Signal seen by this detector for the given polarizations.
    ///
    /// `parameters` must contain `ra`, `dec`, `geocent_time` and `psi`.
    pub fn get_detector_response(
        &self,
        polarizations: &Polarizations,
        parameters: &Parameters,
    ) -> Result<Vec<Complex64>, DetectorError> {
        let sky = SkyPosition::from_parameters(parameters)?;
        self.detector_response(polarizations, &sky)
    }

    /// Typed form of `get_detector_response`.
    pub fn detector_response(
        &self,
        polarizations: &Polarizations,
        sky: &SkyPosition,
    ) -> Result<Vec<Complex64>, DetectorError> {
        let n = self.frequency_array.len();
        for content in polarizations.values() {
            if content.len() != n {
                return Err(DetectorError::LengthMismatch {
                    expected: n,
                    found: content.len(),
                });
            }
        }

        let mut signal = vec![Complex64::new(0.0, 0.0); n];
        for (&mode, content) in polarizations {
            let response = self.antenna_response(sky.ra, sky.dec, sky.geocent_time, sky.psi, mode);
            for (acc, &h) in signal.iter_mut().zip(content) {
                *acc += h * response;
            }
        }

        let time_shift = self.time_delay_from_geocenter(sky.ra, sky.dec, sky.geocent_time) + sky.geocent_time;
        for (acc, &f) in signal.iter_mut().zip(&self.frequency_array) {
            *acc *= Complex64::from_polar(1.0, -TAU * f * time_shift);
        }

        Ok(signal)
    }

    /// Add the detector response to `data`.
    pub fn inject_signal(&mut self, polarizations: &Polarizations, parameters: &Parameters) -> Result<(), DetectorError> {
        let signal = self.get_detector_response(polarizations, parameters)?;
        if self.data.len() != signal.len() {
            return Err(DetectorError::LengthMismatch {
                expected: signal.len(),
                found: self.data.len(),
            });
        }
        for (d, s) in self.data.iter_mut().zip(signal) {
            *d += s;
        }
        Ok(())
    }

    /// Evaluate `model` on this detector's frequency grid and inject the result.
    pub fn inject_waveform(&mut self, model: &dyn WaveformModel, parameters: &Parameters) -> Result<(), DetectorError> {
        let polarizations = model.frequency_domain_strain(&self.frequency_array, parameters)?;
        self.inject_signal(&polarizations, parameters)
    }

    /// Replace `data` and `frequency_array`.
    pub fn set_data(&mut self, sampling_frequency: f64, duration: f64, source: DataSource) -> Result<(), DetectorError> {
        let (strain, frequencies) = match source {
            DataSource::FrequencyDomainStrain(strain) => {
                log::info!("Setting {} data using provided frequency_domain_strain", self.name);
                let frequencies = frequency_series(sampling_frequency, duration)?;
                if strain.len() != frequencies.len() {
                    return Err(DetectorError::LengthMismatch {
                        expected: frequencies.len(),
                        found: strain.len(),
                    });
                }
                (strain, frequencies)
            }
            DataSource::NoiseRealisation { seed } => {
                log::info!(
                    "Setting {} data using noise realisation from provided power_spectral_density",
                    self.name
                );
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                self.power_spectral_density
                    .get_noise_realisation(sampling_frequency, duration, &mut rng)?
            }
        };
        self.data = strain;
        self.frequency_array = frequencies;
        Ok(())
    }

    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    pub fn frequency_array(&self) -> &[f64] {
        &self.frequency_array
    }

    pub fn power_spectral_density(&self) -> &PowerSpectralDensity {
        &self.power_spectral_density
    }

    /// PSD resampled onto `frequency_array`.
    pub fn power_spectral_density_array(&self) -> Vec<f64> {
        self.power_spectral_density
            .power_spectral_density_interpolated_array(&self.frequency_array)
    }

    pub fn amplitude_spectral_density_array(&self) -> Vec<f64> {
        self.power_spectral_density_array().into_iter().map(f64::sqrt).collect()
    }

    /// `data` divided by the amplitude spectral density at each bin.
    pub fn whitened_data(&self) -> Vec<Complex64> {
        self.data
            .iter()
            .zip(self.amplitude_spectral_density_array())
            .map(|(&d, asd)| d / asd)
            .collect()
    }
}
