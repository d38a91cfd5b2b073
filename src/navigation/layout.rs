//! RINEX V2 GPS NAV record layout.
//!
//! A GPS ephemeris is made of 8 lines:
//! - `PRN / EPOCH / SV CLK`: I2,1X,I2.2,1X,I2,1X,I2,1X,I2,1X,I2,F5.1,3D19.12
//! - `BROADCAST ORBIT - 1..7`: 3X,4D19.12
//!
//! Every field is described once in [EPHEMERIS_LAYOUT], which is the single
//! source of truth for the position to meaning mapping.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Number of lines in a GPS ephemeris record
pub const RECORD_LINES: usize = 8;

/// Width of a D19.12 field
const WORD: usize = 19;

/// Continuation lines start with 3 blank columns
const ORBIT_OFFSET: usize = 3;

/// Start column of the nth D19.12 word of a continuation line
const fn orbit_word(nth: usize) -> usize {
    ORBIT_OFFSET + nth * WORD
}

/// Start column of the nth D19.12 word of the first line
const fn clock_word(nth: usize) -> usize {
    22 + nth * WORD
}

/// Every [Field] of a GPS ephemeris record
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Field {
    /// Satellite PRN number
    Prn,
    /// Time of clock
    Toc,
    /// SV clock bias (s)
    ClockBias,
    /// SV clock drift (s.s⁻¹)
    ClockDrift,
    /// SV clock drift rate (s.s⁻²)
    ClockDriftRate,
    Iode,
    Crs,
    DeltaN,
    M0,
    Cuc,
    Eccentricity,
    Cus,
    SqrtA,
    /// Time of ephemeris (s of GPS week)
    Toe,
    Cic,
    Omega0,
    Cis,
    I0,
    Crc,
    Omega,
    OmegaDot,
    Idot,
    L2Codes,
    /// GPS week, to go with ToE
    Week,
    L2PFlag,
    SvAccuracy,
    SvHealth,
    Tgd,
    Iodc,
    /// Transmission time of message (s of GPS week)
    TransmissionTime,
    /// Fit interval (hours)
    FitInterval,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Prn => write!(f, "PRN"),
            Self::Toc => write!(f, "ToC"),
            Self::ClockBias => write!(f, "af0"),
            Self::ClockDrift => write!(f, "af1"),
            Self::ClockDriftRate => write!(f, "af2"),
            Self::Iode => write!(f, "IODE"),
            Self::Crs => write!(f, "Crs"),
            Self::DeltaN => write!(f, "DeltaN"),
            Self::M0 => write!(f, "M0"),
            Self::Cuc => write!(f, "Cuc"),
            Self::Eccentricity => write!(f, "e"),
            Self::Cus => write!(f, "Cus"),
            Self::SqrtA => write!(f, "sqrtA"),
            Self::Toe => write!(f, "ToE"),
            Self::Cic => write!(f, "Cic"),
            Self::Omega0 => write!(f, "Omega0"),
            Self::Cis => write!(f, "Cis"),
            Self::I0 => write!(f, "i0"),
            Self::Crc => write!(f, "Crc"),
            Self::Omega => write!(f, "omega"),
            Self::OmegaDot => write!(f, "OmegaDot"),
            Self::Idot => write!(f, "IDOT"),
            Self::L2Codes => write!(f, "L2 codes"),
            Self::Week => write!(f, "GPS week"),
            Self::L2PFlag => write!(f, "L2 P flag"),
            Self::SvAccuracy => write!(f, "SV accuracy"),
            Self::SvHealth => write!(f, "SV health"),
            Self::Tgd => write!(f, "TGD"),
            Self::Iodc => write!(f, "IODC"),
            Self::TransmissionTime => write!(f, "t_tm"),
            Self::FitInterval => write!(f, "fit interval"),
        }
    }
}

/// How a [Field] is to be decoded
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// I2 satellite number
    Prn,
    /// yy mm dd hh mm ss.s
    Epoch,
    /// D19.12 floating point number
    Float,
}

/// [FieldLayout] describes where a [Field] lives within a record
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    /// Field
    pub field: Field,
    /// Line index within the record (0..8)
    pub line: usize,
    /// Start column (0 based)
    pub start: usize,
    /// Width in columns
    pub width: usize,
    /// Decoding method
    pub encoding: Encoding,
    /// Field must be present and valid, for the record to be valid.
    /// Optional fields may be blank (or omitted).
    pub required: bool,
}

impl FieldLayout {
    const fn float(field: Field, line: usize, start: usize, required: bool) -> Self {
        Self {
            field,
            line,
            start,
            width: WORD,
            encoding: Encoding::Float,
            required,
        }
    }

    /// End column (excluded)
    pub const fn end(&self) -> usize {
        self.start + self.width
    }

    /// Returns the (possibly empty) content of this field in given line.
    /// Short lines (right trimmed) are tolerated.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        let end = self.end().min(line.len());
        let start = self.start.min(end);
        line.get(start..end).unwrap_or("")
    }
}

/// GPS ephemeris record layout, in file order
pub const EPHEMERIS_LAYOUT: [FieldLayout; 31] = [
    // PRN / EPOCH / SV CLK
    FieldLayout {
        field: Field::Prn,
        line: 0,
        start: 0,
        width: 2,
        encoding: Encoding::Prn,
        required: true,
    },
    FieldLayout {
        field: Field::Toc,
        line: 0,
        start: 2,
        width: 20,
        encoding: Encoding::Epoch,
        required: true,
    },
    FieldLayout::float(Field::ClockBias, 0, clock_word(0), true),
    FieldLayout::float(Field::ClockDrift, 0, clock_word(1), true),
    FieldLayout::float(Field::ClockDriftRate, 0, clock_word(2), true),
    // BROADCAST ORBIT - 1
    FieldLayout::float(Field::Iode, 1, orbit_word(0), true),
    FieldLayout::float(Field::Crs, 1, orbit_word(1), true),
    FieldLayout::float(Field::DeltaN, 1, orbit_word(2), true),
    FieldLayout::float(Field::M0, 1, orbit_word(3), true),
    // BROADCAST ORBIT - 2
    FieldLayout::float(Field::Cuc, 2, orbit_word(0), true),
    FieldLayout::float(Field::Eccentricity, 2, orbit_word(1), true),
    FieldLayout::float(Field::Cus, 2, orbit_word(2), true),
    FieldLayout::float(Field::SqrtA, 2, orbit_word(3), true),
    // BROADCAST ORBIT - 3
    FieldLayout::float(Field::Toe, 3, orbit_word(0), true),
    FieldLayout::float(Field::Cic, 3, orbit_word(1), true),
    FieldLayout::float(Field::Omega0, 3, orbit_word(2), true),
    FieldLayout::float(Field::Cis, 3, orbit_word(3), true),
    // BROADCAST ORBIT - 4
    FieldLayout::float(Field::I0, 4, orbit_word(0), true),
    FieldLayout::float(Field::Crc, 4, orbit_word(1), true),
    FieldLayout::float(Field::Omega, 4, orbit_word(2), true),
    FieldLayout::float(Field::OmegaDot, 4, orbit_word(3), true),
    // BROADCAST ORBIT - 5
    FieldLayout::float(Field::Idot, 5, orbit_word(0), true),
    FieldLayout::float(Field::L2Codes, 5, orbit_word(1), false),
    FieldLayout::float(Field::Week, 5, orbit_word(2), false),
    FieldLayout::float(Field::L2PFlag, 5, orbit_word(3), false),
    // BROADCAST ORBIT - 6
    FieldLayout::float(Field::SvAccuracy, 6, orbit_word(0), false),
    FieldLayout::float(Field::SvHealth, 6, orbit_word(1), false),
    FieldLayout::float(Field::Tgd, 6, orbit_word(2), false),
    FieldLayout::float(Field::Iodc, 6, orbit_word(3), false),
    // BROADCAST ORBIT - 7
    FieldLayout::float(Field::TransmissionTime, 7, orbit_word(0), false),
    FieldLayout::float(Field::FitInterval, 7, orbit_word(1), false),
];

/// Returns the [FieldLayout] of given [Field]
pub fn field_layout(field: Field) -> Option<&'static FieldLayout> {
    EPHEMERIS_LAYOUT.iter().find(|layout| layout.field == field)
}

/// Decodes a Fortran D (or E) formatted number, like `0.123456789012D+04`
/// or `-.1234D-08`. Returns None on blank or non numerical content.
pub(crate) fn decode_fortran_f64(content: &str) -> Option<f64> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    let value = content.replace(['D', 'd'], "E").parse::<f64>().ok()?;
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}
