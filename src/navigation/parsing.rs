//! RINEX V2 GPS NAV record parsing
use std::collections::HashMap;

use gnss_rs::prelude::{Constellation, SV};
use hifitime::{Epoch, TimeScale};
use thiserror::Error;

#[cfg(feature = "log")]
use log::{debug, warn};

use crate::{
    constants::Constants,
    epoch::{parse_in_timescale, ParsingError as EpochParsingError},
    navigation::{
        ephemeris::{EphemerisRecord, Kepler, Perturbations},
        layout::{decode_fortran_f64, Encoding, Field, EPHEMERIS_LAYOUT, RECORD_LINES},
    },
};

/// Record scoped parsing errors. A [FormatError] rejects one
/// record but never aborts the parsing of the remaining file.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("expecting {expected} lines per record, got {0}", expected = RECORD_LINES)]
    LineCount(usize),
    #[error("continuation line(s) without record start")]
    OrphanLines,
    #[error("invalid satellite number \"{0}\"")]
    InvalidSatellite(String),
    #[error("invalid time of clock: {0}")]
    Epoch(#[from] EpochParsingError),
    #[error("missing {0} field")]
    MissingField(Field),
    #[error("invalid {field} field \"{content}\"")]
    InvalidField { field: Field, content: String },
}

/// [RecordError] is a [FormatError] located in the file
#[derive(Error, Debug)]
#[error("line {line}: {error}")]
pub struct RecordError {
    /// Line number (1 based) of the first line of the rejected record
    pub line: usize,
    /// Rejection cause
    pub error: FormatError,
}

/// Returns true if this line starts a new record
/// (PRN in the first columns, continuations start with 3 blanks).
pub(crate) fn is_new_record(line: &str) -> bool {
    !line.chars().take(3).all(|c| c == ' ')
}

/// Decoded content of a record, per [Field]
struct Fields {
    values: HashMap<Field, f64>,
}

impl Fields {
    fn required(&self, field: Field) -> Result<f64, FormatError> {
        self.values
            .get(&field)
            .copied()
            .ok_or(FormatError::MissingField(field))
    }

    fn optional(&self, field: Field) -> Option<f64> {
        self.values.get(&field).copied()
    }
}

/// Recovers the GPS week of this ToE (s of week),
/// from the week number (when described) and the time of clock.
fn toe_epoch(week: Option<u32>, toe: f64, toc: Epoch) -> Epoch {
    let nanos = (toe * 1.0E9).round() as u64;
    if let Some(week) = week {
        let epoch = Epoch::from_time_of_week(week, nanos, TimeScale::GPST);
        // ToE and ToC are never a week apart: any larger gap is a truncated week counter
        if (epoch - toc).abs().to_seconds() < Constants::WEEK_SECONDS {
            return epoch;
        }
        #[cfg(feature = "log")]
        debug!("week counter {} inconsistent with toc {}", week, toc);
    }

    let (toc_week, _) = toc.to_time_of_week();
    let mut candidates = vec![toc_week, toc_week + 1];
    if toc_week > 0 {
        candidates.push(toc_week - 1);
    }
    candidates
        .into_iter()
        .map(|week| Epoch::from_time_of_week(week, nanos, TimeScale::GPST))
        .min_by_key(|epoch| (*epoch - toc).abs())
        .unwrap_or(toc)
}

/// Parses one 8 line GPS ephemeris record.
pub(crate) fn parse_record(lines: &[&str]) -> Result<EphemerisRecord, FormatError> {
    if lines.len() != RECORD_LINES {
        return Err(FormatError::LineCount(lines.len()));
    }

    let mut sv = Option::<SV>::None;
    let mut toc = Option::<Epoch>::None;
    let mut fields = Fields {
        values: HashMap::with_capacity(EPHEMERIS_LAYOUT.len()),
    };

    for layout in EPHEMERIS_LAYOUT.iter() {
        let content = layout.slice(lines[layout.line]);
        match layout.encoding {
            Encoding::Prn => {
                let prn = content
                    .trim()
                    .parse::<u8>()
                    .map_err(|_| FormatError::InvalidSatellite(content.to_string()))?;
                if prn == 0 || prn > Constants::MAX_GPS_PRN {
                    return Err(FormatError::InvalidSatellite(content.to_string()));
                }
                sv = Some(SV::new(Constellation::GPS, prn));
            },
            Encoding::Epoch => {
                toc = Some(parse_in_timescale(content, TimeScale::GPST)?);
            },
            Encoding::Float => {
                if content.trim().is_empty() {
                    if layout.required {
                        return Err(FormatError::MissingField(layout.field));
                    }
                    continue;
                }
                let value =
                    decode_fortran_f64(content).ok_or_else(|| FormatError::InvalidField {
                        field: layout.field,
                        content: content.trim().to_string(),
                    })?;
                fields.values.insert(layout.field, value);
            },
        }
    }

    let sv = sv.ok_or(FormatError::MissingField(Field::Prn))?;
    let toc = toc.ok_or(FormatError::MissingField(Field::Toc))?;

    let toe = fields.required(Field::Toe)?;
    if !(0.0..Constants::WEEK_SECONDS).contains(&toe) {
        return Err(FormatError::InvalidField {
            field: Field::Toe,
            content: toe.to_string(),
        });
    }

    let week = match fields.optional(Field::Week) {
        Some(week) if week >= 1.0 && week <= u32::MAX as f64 && week.fract() == 0.0 => {
            Some(week as u32)
        },
        _ => None,
    };

    let toe_epoch = toe_epoch(week, toe, toc);

    // week counters that do not describe this ToE are not kept
    let week = week.filter(|week| toe_epoch.to_time_of_week().0 == *week);

    let kepler = Kepler {
        sqrt_a: fields.required(Field::SqrtA)?,
        e: fields.required(Field::Eccentricity)?,
        i_0: fields.required(Field::I0)?,
        omega_0: fields.required(Field::Omega0)?,
        m_0: fields.required(Field::M0)?,
        omega: fields.required(Field::Omega)?,
        toe,
    };

    let perturbations = Perturbations {
        dn: fields.required(Field::DeltaN)?,
        i_dot: fields.required(Field::Idot)?,
        omega_dot: fields.required(Field::OmegaDot)?,
        cus: fields.required(Field::Cus)?,
        cuc: fields.required(Field::Cuc)?,
        cis: fields.required(Field::Cis)?,
        cic: fields.required(Field::Cic)?,
        crs: fields.required(Field::Crs)?,
        crc: fields.required(Field::Crc)?,
    };

    Ok(EphemerisRecord {
        sv,
        toc,
        toe_epoch,
        clock_bias: fields.required(Field::ClockBias)?,
        clock_drift: fields.required(Field::ClockDrift)?,
        clock_drift_rate: fields.required(Field::ClockDriftRate)?,
        iode: fields.required(Field::Iode)?,
        kepler,
        perturbations,
        l2_codes: fields.optional(Field::L2Codes),
        week,
        l2p_flag: fields.optional(Field::L2PFlag),
        sv_accuracy: fields.optional(Field::SvAccuracy),
        sv_health: fields.optional(Field::SvHealth),
        tgd: fields.optional(Field::Tgd),
        iodc: fields.optional(Field::Iodc),
        transmission_time: fields.optional(Field::TransmissionTime),
        fit_interval: fields.optional(Field::FitInterval),
    })
}

/// Parses a NAV body (everything past the header), in file order.
/// `first_line` is the line number (1 based) of the first body line.
/// Returns valid records and rejected records. Blank lines between records
/// are ignored, blank lines within a record stand for optional orbit lines.
pub fn parse_records(
    body: &str,
    first_line: usize,
) -> (Vec<EphemerisRecord>, Vec<RecordError>) {
    let mut records = Vec::<EphemerisRecord>::new();
    let mut errors = Vec::<RecordError>::new();

    // (line number, lines) of each candidate group
    let mut groups = Vec::<(usize, Vec<&str>)>::new();

    for (nth, line) in body.lines().enumerate() {
        if line.trim().is_empty() {
            if let Some((_, lines)) = groups.last_mut() {
                if lines.len() < RECORD_LINES {
                    lines.push(line);
                }
            }
            continue;
        }
        match groups.last_mut() {
            Some((_, lines)) if !is_new_record(line) => lines.push(line),
            _ => groups.push((first_line + nth, vec![line])),
        }
    }

    for (line, lines) in groups {
        let parsed = if is_new_record(lines[0]) {
            parse_record(&lines)
        } else {
            Err(FormatError::OrphanLines)
        };
        match parsed {
            Ok(record) => {
                #[cfg(feature = "log")]
                debug!("{} - {}: toe {}", line, record.sv, record.toe_epoch);
                records.push(record);
            },
            Err(error) => {
                #[cfg(feature = "log")]
                warn!("line {}: rejected record: {}", line, error);
                errors.push(RecordError { line, error });
            },
        }
    }

    (records, errors)
}

#[cfg(test)]
mod test {
    use super::*;

    const RECORD: &str = " 7 23  9  9  0  0  0.0 0.123456789012D-03-0.102318153950D-11 0.000000000000D+00
    0.290000000000D+02-0.125000000000D+02 0.450126322014D-08 0.102000000000D+01
   -0.540167093277D-06 0.100000000000D-01 0.826455652714D-05 0.515365039062D+04
    0.518400000000D+06 0.149011611938D-07 0.123000000000D+01-0.111758708954D-07
    0.960000000000D+00 0.187312500000D+03 0.654000000000D+00-0.800000000000D-08
    0.100000000000D-09 0.100000000000D+01 0.227800000000D+04 0.000000000000D+00
    0.200000000000D+01 0.000000000000D+00 0.465661287308D-08 0.290000000000D+02
    0.511218000000D+06 0.400000000000D+01
";

    fn lines(content: &str) -> Vec<&str> {
        content.lines().collect()
    }

    #[test]
    fn record_start() {
        assert!(is_new_record(" 7 23  9  9  0  0  0.0"));
        assert!(is_new_record("12 23  9  9  0  0  0.0"));
        assert!(!is_new_record("    0.290000000000D+02"));
        assert!(!is_new_record("   -0.540167093277D-06"));
    }

    #[test]
    fn gps_record() {
        let record = parse_record(&lines(RECORD)).unwrap();
        assert_eq!(record.sv, SV::new(Constellation::GPS, 7));
        assert_eq!(
            record.toc,
            Epoch::from_gregorian(2023, 9, 9, 0, 0, 0, 0, TimeScale::GPST)
        );
        assert_eq!(record.clock_bias, 0.123456789012E-03);
        assert_eq!(record.clock_drift, -0.102318153950E-11);
        assert_eq!(record.clock_drift_rate, 0.0);
        assert_eq!(record.iode, 29.0);
        assert_eq!(record.perturbations.crs, -12.5);
        assert_eq!(record.perturbations.dn, 0.450126322014E-08);
        assert_eq!(record.kepler.m_0, 1.02);
        assert_eq!(record.perturbations.cuc, -0.540167093277E-06);
        assert_eq!(record.kepler.e, 0.01);
        assert_eq!(record.perturbations.cus, 0.826455652714E-05);
        assert_eq!(record.kepler.sqrt_a, 0.515365039062E+04);
        assert_eq!(record.kepler.toe, 518400.0);
        assert_eq!(record.perturbations.cic, 0.149011611938E-07);
        assert_eq!(record.kepler.omega_0, 1.23);
        assert_eq!(record.perturbations.cis, -0.111758708954E-07);
        assert_eq!(record.kepler.i_0, 0.96);
        assert_eq!(record.perturbations.crc, 187.3125);
        assert_eq!(record.kepler.omega, 0.654);
        assert_eq!(record.perturbations.omega_dot, -0.8E-08);
        assert_eq!(record.perturbations.i_dot, 0.1E-09);
        assert_eq!(record.l2_codes, Some(1.0));
        assert_eq!(record.week, Some(2278));
        assert_eq!(record.l2p_flag, Some(0.0));
        assert_eq!(record.sv_accuracy, Some(2.0));
        assert_eq!(record.sv_health, Some(0.0));
        assert_eq!(record.tgd, Some(0.465661287308E-08));
        assert_eq!(record.iodc, Some(29.0));
        assert_eq!(record.transmission_time, Some(511218.0));
        assert_eq!(record.fit_interval, Some(4.0));
        // 2023-09-09 is the saturday of week 2278
        assert_eq!(
            record.toe_epoch,
            Epoch::from_time_of_week(2278, 518_400_000_000_000, TimeScale::GPST)
        );
    }

    #[test]
    fn week_recovery() {
        let toc = Epoch::from_gregorian(2023, 9, 9, 0, 0, 0, 0, TimeScale::GPST);
        let expected = Epoch::from_time_of_week(2278, 518_400_000_000_000, TimeScale::GPST);
        assert_eq!(toe_epoch(None, 518400.0, toc), expected);
        // mod 1024 week counter
        assert_eq!(toe_epoch(Some(2278 - 2048), 518400.0, toc), expected);
        // toe slightly ahead of toc, across the week boundary
        let toc = Epoch::from_time_of_week(2278, 604_000_000_000_000, TimeScale::GPST);
        assert_eq!(
            toe_epoch(None, 0.0, toc),
            Epoch::from_time_of_week(2279, 0, TimeScale::GPST)
        );
    }

    #[test]
    fn blank_optional_fields() {
        let content = RECORD.replace(
            "    0.200000000000D+01 0.000000000000D+00 0.465661287308D-08 0.290000000000D+02",
            "",
        );
        let record = parse_record(&lines(&content)).unwrap();
        assert!(record.sv_accuracy.is_none());
        assert!(record.sv_health.is_none());
        assert!(record.tgd.is_none());
        assert!(record.iodc.is_none());
        assert_eq!(record.fit_interval, Some(4.0));
    }

    #[test]
    fn blank_optional_lines_in_body() {
        let blank = " ".repeat(79);
        let orbit_6 =
            "    0.200000000000D+01 0.000000000000D+00 0.465661287308D-08 0.290000000000D+02";
        let orbit_7 = "    0.511218000000D+06 0.400000000000D+01";

        // blank line 6, then blank line 7 followed by another record
        let first = RECORD.replace(orbit_6, &blank);
        let second = RECORD.replacen(" 7 ", " 8 ", 1).replace(orbit_7, "");
        let third = RECORD.replacen(" 7 ", " 9 ", 1);
        let body = format!("\n{}\n{}{}", first, second, third);

        let (records, errors) = parse_records(&body, 1);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].prn(), 7);
        assert!(records[0].sv_accuracy.is_none());
        assert!(records[0].iodc.is_none());
        assert_eq!(records[0].fit_interval, Some(4.0));

        assert_eq!(records[1].prn(), 8);
        assert_eq!(records[1].iodc, Some(29.0));
        assert!(records[1].transmission_time.is_none());
        assert!(records[1].fit_interval.is_none());

        assert_eq!(records[2].prn(), 9);
        assert_eq!(records[2].fit_interval, Some(4.0));
    }

    #[test]
    fn corrupt_week_counter() {
        let content = RECORD.replace("0.227800000000D+04", "0.999999999999D+20");
        let record = parse_record(&lines(&content)).unwrap();
        assert!(record.week.is_none());
        assert_eq!(
            record.toe_epoch,
            Epoch::from_time_of_week(2278, 518_400_000_000_000, TimeScale::GPST)
        );

        // mod 1024 counter: toe is recovered, counter is dropped
        let content = RECORD.replace("0.227800000000D+04", "0.230000000000D+03");
        let record = parse_record(&lines(&content)).unwrap();
        assert!(record.week.is_none());
        assert_eq!(
            record.toe_epoch,
            Epoch::from_time_of_week(2278, 518_400_000_000_000, TimeScale::GPST)
        );
    }

    #[test]
    fn rejected_records() {
        // invalid PRN
        let content = RECORD.replacen(" 7 23", "33 23", 1);
        assert!(matches!(
            parse_record(&lines(&content)),
            Err(FormatError::InvalidSatellite(_))
        ));

        // non numerical content
        let content = RECORD.replace("0.515365039062D+04", "0.51536503906X+04");
        match parse_record(&lines(&content)) {
            Err(FormatError::InvalidField { field, content }) => {
                assert_eq!(field, Field::SqrtA);
                assert_eq!(content, "0.51536503906X+04");
            },
            other => panic!("unexpected result: {:?}", other),
        }

        // blank required field
        let content = RECORD.replace("0.100000000000D-01", "                  ");
        assert!(matches!(
            parse_record(&lines(&content)),
            Err(FormatError::MissingField(Field::Eccentricity))
        ));

        // truncated
        let lines = lines(RECORD);
        assert!(matches!(
            parse_record(&lines[..7]),
            Err(FormatError::LineCount(7))
        ));
    }

    #[test]
    fn malformed_record_isolation() {
        let truncated = RECORD.lines().take(7).collect::<Vec<_>>().join("\n");
        let body = format!("{}{}\n{}", RECORD, truncated, RECORD.replacen(" 7 ", " 8 ", 1));

        let (records, errors) = parse_records(&body, 10);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].prn(), 7);
        assert_eq!(records[1].prn(), 8);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 18);
        assert!(matches!(errors[0].error, FormatError::LineCount(7)));
    }

    #[test]
    fn orphan_lines() {
        let body = "    0.290000000000D+02-0.125000000000D+02 0.450126322014D-08 0.102000000000D+01\n";
        let (records, errors) = parse_records(body, 1);
        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].error, FormatError::OrphanLines));
    }
}
