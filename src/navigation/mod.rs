//! GPS `Navigation` data module
mod ephemeris;
mod kepler;
mod layout;
mod parsing;
mod selection;

pub use ephemeris::{EphemerisRecord, Kepler, Perturbations};
pub use kepler::{compute, solve_kepler, wrap_half_week, ComputationResult, Helper, KeplerError};
pub use layout::{field_layout, Encoding, Field, FieldLayout, EPHEMERIS_LAYOUT, RECORD_LINES};
pub use parsing::{parse_records, FormatError, RecordError};
pub use selection::{select, Advisory, Selection, Solution};

pub(crate) use layout::decode_fortran_f64;
