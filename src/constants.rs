//! GPS (WGS-84 / IS-GPS-200) constants

/// Earth gravitational constant (m³.s⁻²)
pub(crate) struct GM;

impl GM {
    pub const GPS: f64 = 3.9860050E14;
}

/// Earth rotation rate (rad.s⁻¹)
pub(crate) struct Omega;

impl Omega {
    pub const GPS: f64 = 7.2921151467E-5;
}

/// Const values used in this crate
pub(crate) struct Constants;

impl Constants {
    /// Maximal iteration in the iterative Kepler solver
    pub const MAX_KEPLER_ITER: usize = 30;

    /// Kepler solver convergence criterion (rad)
    pub const KEPLER_TOLERANCE: f64 = 1.0E-12;

    /// One GPS week (s)
    pub const WEEK_SECONDS: f64 = 604800.0;

    /// Half a GPS week (s), ToE rollover threshold
    pub const HALF_WEEK_SECONDS: f64 = 302400.0;

    /// Broadcast ephemeris validity (s), on each side of ToE
    pub const VALIDITY_WINDOW_SECONDS: f64 = 7200.0;

    /// GPS - UTC leap seconds, in force since 2017-01-01.
    /// Used when neither the user nor the file header specify it.
    pub const DEFAULT_LEAP_SECONDS: u32 = 18;

    /// Highest GPS PRN number in the legacy constellation
    pub const MAX_GPS_PRN: u8 = 32;
}
