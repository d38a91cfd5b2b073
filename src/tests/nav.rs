#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::tests::toolkit::{check_gps_position, test_resource};
    use std::str::FromStr;

    const SYNTHETIC: &str =
" 3 23  9  6  0  0  0.0 0.100000000000D-03 0.000000000000D+00 0.000000000000D+00
    0.100000000000D+02 0.000000000000D+00 0.000000000000D+00 0.000000000000D+00
    0.000000000000D+00 0.100000000000D-01 0.000000000000D+00 5.153650390625D+03
    0.259200000000D+06 0.000000000000D+00 0.000000000000D+00 0.000000000000D+00
    0.961000000000D+00 0.000000000000D+00 0.000000000000D+00 0.000000000000D+00
    0.000000000000D+00 0.100000000000D+01 0.227800000000D+04 0.000000000000D+00
    0.200000000000D+01 0.000000000000D+00 0.000000000000D+00 0.100000000000D+02
    0.259170000000D+06 0.400000000000D+01
";

    fn g(prn: u8) -> SV {
        SV::new(Constellation::GPS, prn)
    }

    #[test]
    fn v2_brdc2490_23n() {
        let nav = NavFile::from_file(test_resource("NAV/V2/brdc2490.23n")).unwrap();

        assert_eq!(nav.header.version, Version::new(2, 11));
        assert_eq!(nav.header.program.as_deref(), Some("CCRINEXN V1.6.0 UX"));
        assert_eq!(nav.header.leap_seconds(), Some(18));
        assert!(nav.header.ion_alpha.is_some());
        assert!(nav.header.ion_beta.is_some());

        assert_eq!(nav.records().len(), 6);
        assert!(nav.rejected().is_empty());
        assert_eq!(nav.satellites(), vec![g(1), g(7), g(12), g(25)]);

        // file order is preserved
        let prns = nav.records().iter().map(|r| r.prn()).collect::<Vec<_>>();
        assert_eq!(prns, vec![1, 7, 12, 1, 7, 25]);

        let g01 = nav.ephemerides(g(1)).collect::<Vec<_>>();
        assert_eq!(g01.len(), 2);
        assert_eq!(g01[0].iode, 29.0);
        assert_eq!(g01[1].iode, 31.0);
        assert_eq!(g01[0].kepler.m_0, 1.02);
        assert_eq!(g01[1].kepler.m_0, 1.22);
        assert_eq!(
            g01[0].toe_epoch,
            Epoch::from_time_of_week(2278, 259_200_000_000_000, TimeScale::GPST)
        );
        assert_eq!(
            g01[1].toe_epoch,
            Epoch::from_time_of_week(2278, 266_400_000_000_000, TimeScale::GPST)
        );

        let g07 = nav.ephemerides(g(7)).next().unwrap();
        assert_eq!(g07.kepler.sqrt_a, 0.515371240234E+04);
        assert_eq!(g07.kepler.e, 0.152371097356E-01);
        assert_eq!(g07.kepler.m_0, -0.271828182846E+01);
        assert_eq!(g07.kepler.omega_0, -0.187342870438E+01);
        assert_eq!(g07.perturbations.crs, 88.40625);
        assert_eq!(g07.clock_bias, -0.345678901234E-04);
        assert_eq!(g07.tgd, Some(-0.111758708954E-07));
        assert_eq!(g07.transmission_time, Some(259170.0));

        assert_eq!(nav.ephemerides(g(5)).count(), 0);
    }

    #[test]
    fn field_mapping() {
        let nav = NavFile::parse(SYNTHETIC).unwrap();
        assert_eq!(nav.records().len(), 1);

        let record = &nav.records()[0];
        assert_eq!(record.sv, g(3));
        assert!((record.kepler.sqrt_a - 5153.650390625).abs() < 1.0E-9);
        assert!((record.kepler.e - 0.01).abs() < 1.0E-9);
        assert!((record.kepler.toe - 259200.0).abs() < 1.0E-9);
        assert!((record.kepler.i_0 - 0.961).abs() < 1.0E-9);
        assert!((record.clock_bias - 1.0E-4).abs() < 1.0E-9);
        assert_eq!(record.iode, 10.0);
        assert_eq!(record.iodc, Some(10.0));
        assert_eq!(record.week, Some(2278));
        assert_eq!(record.fit_interval, Some(4.0));
        assert_eq!(
            record.toc,
            Epoch::from_gregorian(2023, 9, 6, 0, 0, 0, 0, TimeScale::GPST)
        );
    }

    #[test]
    fn malformed_record_isolation() {
        let nav = NavFile::from_file(test_resource("NAV/V2/malformed.23n")).unwrap();
        assert_eq!(nav.records().len(), 1);
        assert_eq!(nav.records()[0].sv, g(1));

        assert_eq!(nav.rejected().len(), 1);
        let rejected = &nav.rejected()[0];
        // 8 header lines, 8 record lines
        assert_eq!(rejected.line, 17);
        assert!(matches!(rejected.error, FormatError::LineCount(7)));
    }

    #[test]
    fn headerless_file() {
        let nav = NavFile::from_file(test_resource("NAV/V2/noheader.23n")).unwrap();
        assert_eq!(nav.satellites(), vec![g(12)]);
        assert_eq!(nav.header.leap_seconds(), None);

        // leap seconds default to 18
        let utc = CivilTime::from_str("2023-09-06 00:00:00").unwrap();
        let solution = nav.compute_position(g(12), utc, &Config::default()).unwrap();
        assert_eq!(solution.leap_seconds, 18);
        check_gps_position(&solution.result);
    }

    #[test]
    fn non_gps_files() {
        match NavFile::from_file(test_resource("NAV/V2/brdc2490.23g")) {
            Err(ParsingError::Header(e)) => {
                assert!(e.to_string().contains("GLONASS"), "{}", e);
            },
            other => panic!("unexpected result: {:?}", other.map(|nav| nav.records().len())),
        }
    }

    #[test]
    fn no_valid_records() {
        let truncated = SYNTHETIC.lines().take(7).collect::<Vec<_>>().join("\n");
        match NavFile::parse(&truncated) {
            Err(ParsingError::NoEphemeris(rejected)) => {
                assert_eq!(rejected.len(), 1);
                assert_eq!(rejected[0].line, 1);
            },
            other => panic!("unexpected result: {:?}", other.map(|nav| nav.records().len())),
        }
        assert!(matches!(
            NavFile::parse(""),
            Err(ParsingError::NoEphemeris(_))
        ));
        assert!(matches!(
            NavFile::from_file(test_resource("NAV/V2/does_not_exist.23n")),
            Err(ParsingError::IoError(_))
        ));
    }

    #[test]
    fn position_computation() {
        let nav = NavFile::from_file(test_resource("NAV/V2/brdc2490.23n")).unwrap();
        let cfg = Config::default();

        // 01:00:18 GPST is closer to the 02:00 ToE
        let utc = CivilTime::from_str("2023-09-06 01:00:00").unwrap();
        let solution = nav.compute_position(g(7), utc, &cfg).unwrap();
        assert_eq!(solution.sv, g(7));
        assert_eq!(solution.leap_seconds, 18);
        assert_eq!(
            solution.t,
            Epoch::from_gregorian(2023, 9, 6, 1, 0, 18, 0, TimeScale::GPST)
        );
        assert_eq!(solution.record.iode, 56.0);
        assert!((solution.helper.t_k + 3582.0).abs() < 1.0E-6);
        assert!(solution.advisory.is_none());
        assert!(solution.helper.iterations <= cfg.max_kepler_iter);
        check_gps_position(&solution.result);

        // same instant, propagated from the selected record directly
        let result = compute(&solution.record, solution.t).unwrap();
        assert_eq!(result, solution.result);

        // without leap seconds, 00:59:00 GPST is closer to the 00:00 ToE
        let utc = CivilTime::from_str("2023-09-06 00:59:00").unwrap();
        let solution = nav
            .compute_position(g(7), utc, &cfg.with_leap_seconds(0))
            .unwrap();
        assert_eq!(solution.leap_seconds, 0);
        assert_eq!(solution.record.iode, 54.0);
        assert!((solution.helper.t_k - 3540.0).abs() < 1.0E-6);

        for sv in nav.satellites() {
            let solution = nav.compute_position(sv, utc, &cfg).unwrap();
            check_gps_position(&solution.result);
        }
    }

    #[test]
    fn harmonic_corrections() {
        let nav = NavFile::from_file(test_resource("NAV/V2/brdc2490.23n")).unwrap();
        let record = nav.ephemerides(g(7)).next().unwrap();
        assert_eq!(record.iode, 54.0);
        assert_ne!(record.perturbations.cus, 0.0);
        assert_ne!(record.perturbations.crs, 0.0);
        assert_ne!(record.perturbations.cic, 0.0);
        assert_ne!(record.perturbations.i_dot, 0.0);

        let t = record.toe_epoch + Duration::from_seconds(1234.0);
        let result = compute(record, t).unwrap();

        let expected = (14637571.681703, -3404604.742349, 22305481.800922);
        assert!((result.x - expected.0).abs() < 1.0E-3, "x: {}", result.x);
        assert!((result.y - expected.1).abs() < 1.0E-3, "y: {}", result.y);
        assert!((result.z - expected.2).abs() < 1.0E-3, "z: {}", result.z);
        check_gps_position(&result);
    }

    #[test]
    fn validity_advisory() {
        let nav = NavFile::from_file(test_resource("NAV/V2/brdc2490.23n")).unwrap();
        let utc = CivilTime::from_str("2023-09-06 12:00:00").unwrap();

        // compute and warn, never refuse
        let solution = nav
            .compute_position(g(25), utc, &Config::default())
            .unwrap();
        match solution.advisory {
            Some(Advisory::OutsideValidity { dt_s, window_s }) => {
                assert!((dt_s - 36018.0).abs() < 1.0E-6);
                assert_eq!(window_s, 7200.0);
            },
            None => panic!("missing advisory"),
        }
        check_gps_position(&solution.result);

        let cfg = Config {
            validity_window_s: 86400.0,
            ..Default::default()
        };
        let solution = nav.compute_position(g(25), utc, &cfg).unwrap();
        assert!(solution.advisory.is_none());
    }

    #[test]
    fn unknown_satellite() {
        let utc = CivilTime::from_str("2023-09-06 01:00:00").unwrap();
        match compute_position(
            test_resource("NAV/V2/brdc2490.23n"),
            g(5),
            utc,
            &Config::default(),
        ) {
            Err(Error::NotFound(sv)) => assert_eq!(sv, g(5)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_eccentricity() {
        // parseable, but not a physical orbit
        let content = SYNTHETIC.replace(" 0.100000000000D-01", " 0.100000000000D+01");
        let nav = NavFile::parse(&content).unwrap();
        assert_eq!(nav.records()[0].kepler.e, 1.0);

        let utc = CivilTime::from_str("2023-09-06 00:00:00").unwrap();
        match nav.compute_position(g(3), utc, &Config::default()) {
            Err(Error::Range(KeplerError::Eccentricity(e))) => assert_eq!(e, 1.0),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_requests() {
        let nav = NavFile::parse(SYNTHETIC).unwrap();

        let utc = CivilTime::new(2023, 2, 30, 0, 0, 0);
        assert!(matches!(
            nav.compute_position(g(3), utc, &Config::default()),
            Err(Error::Time(_))
        ));

        let utc = CivilTime::new(2023, 9, 6, 0, 0, 0);
        let cfg = Config {
            max_kepler_iter: 0,
            ..Default::default()
        };
        assert!(matches!(
            nav.compute_position(g(3), utc, &cfg),
            Err(Error::Config(_))
        ));
    }
}
