///////////////////////TESTS////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Nuclei::nucleus::Nucleus;
    use crate::Nuclei::nuclide_table::{NuclideProperties, NuclideTable};
    use crate::Rates::rate_api::{Rate, RateEvaluator, RateType, ReactionSignature};
    use crate::Rates::reaclib::SetFlag;
    use crate::Rates::tfactors::Tfactors;
    use crate::rate_error::RateError;
    use approx::assert_relative_eq;

    const C12_AG: &str = "4
         he4  c12  o16                       nac2      7.16192e+00
 2.546340e+02-1.840970e+00 1.034110e+02-4.205670e+02
 6.408740e+01-1.246240e+01 1.373030e+02
         he4  c12  o16                       nac2      7.16192e+00
 6.965260e+01-1.392540e+00 5.891280e+01-1.482730e+02
 9.083240e+00-5.410410e-01 7.035540e+01
";

    const TRIPLE_ALPHA: &str = "8
         he4  he4  he4  c12                  fy05r     7.27500e+00
-9.710520e-01 0.000000e+00-3.706000e+01 2.934930e+01
-1.155070e+02-1.000000e+01-1.333330e+00
         he4  he4  he4  c12                  fy05r     7.27500e+00
-2.435050e+01-4.126560e+00-1.349000e+01 2.142590e+01
-1.347690e+00 8.798160e-02-1.316530e+01
         he4  he4  he4  c12                  fy05n     7.27500e+00
-1.178840e+01-1.024460e+00-2.357000e+01 2.048860e+01
-1.298820e+01-2.000000e+01-2.166670e+00
";

    /// one set with a0 and a4 set, everything else zero
    fn single_set(chapter: &str, nuclei: &str, a0: f64, a4: f64) -> String {
        format!(
            "{}\n {} test 0.0\n{:13.6e}{:13.6e}{:13.6e}{:13.6e}\n{:13.6e}{:13.6e}{:13.6e}\n",
            chapter, nuclei, a0, 0.0, 0.0, 0.0, a4, 0.0, 0.0
        )
    }

    fn exponent(a: &[f64; 7], t9: f64) -> f64 {
        a[0] + a[1] / t9 + a[2] * t9.powf(-1.0 / 3.0) + a[3] * t9.powf(1.0 / 3.0)
            + a[4] * t9
            + a[5] * t9.powf(5.0 / 3.0)
            + a[6] * t9.ln()
    }

    #[test]
    fn test_parse_fixed_width_rate() {
        let rate = Rate::parse(C12_AG, "c12-ag-o16-nac2").unwrap();
        assert_eq!(rate.rate_type(), RateType::ReaclibAnalytic);
        assert_eq!(rate.chapter().unwrap().number(), 4);
        assert_eq!(rate.to_string(), "he4 + c12 --> o16");
        assert_eq!(rate.label(), "nac2");
        assert_relative_eq!(rate.q_value().unwrap(), 7.16192);
        assert!(!rate.is_resonant() && !rate.is_weak() && !rate.is_reverse());

        let sets = rate.sets().unwrap();
        assert_eq!(sets.len(), 2);
        assert_relative_eq!(sets[0].a[0], 254.634);
        assert_relative_eq!(sets[0].a[1], -1.84097);
        assert_relative_eq!(sets[1].a[6], 70.3554);
        assert_eq!(sets[1].flag, SetFlag::NonResonant);
    }

    #[test]
    fn test_eval_sums_sets() {
        let rate = Rate::parse(C12_AG, "c12-ag-o16-nac2").unwrap();
        let sets = rate.sets().unwrap();
        for t9 in [0.1, 0.5, 1.0, 3.0] {
            let expected: f64 = sets.iter().map(|s| exponent(&s.a, t9).exp()).sum();
            assert_relative_eq!(rate.eval_at(t9 * 1.0e9).unwrap(), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_zero_coefficients_give_unity() {
        let rate = Rate::parse(&single_set("1", "n p", 0.0, 0.0), "n-p").unwrap();
        for t in [1.0e7, 1.0e9, 5.0e9] {
            assert_eq!(rate.eval_at(t).unwrap(), 1.0);
            assert_eq!(rate.eval_derivative_at(t).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let rate = Rate::parse(C12_AG, "c12-ag-o16-nac2").unwrap();
        for t in [2.0e8, 1.0e9, 3.0e9] {
            let h = t * 1.0e-6;
            let numeric = (rate.eval_at(t + h).unwrap() - rate.eval_at(t - h).unwrap()) / (2.0 * h);
            assert_relative_eq!(rate.eval_derivative_at(t).unwrap(), numeric, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_temperature_exponent() {
        // a4 = 2 gives d ln r / d ln T = 2 T9
        let rate = Rate::parse(&single_set("1", "n p", 0.0, 2.0), "n-p").unwrap();
        assert_relative_eq!(rate.temperature_exponent(1.5e9).unwrap(), 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_invalid_temperature() {
        let rate = Rate::parse(C12_AG, "c12-ag-o16-nac2").unwrap();
        assert!(matches!(rate.eval_at(0.0), Err(RateError::InvalidTemperature(_))));
        assert!(matches!(rate.eval_at(-1.0e9), Err(RateError::InvalidTemperature(_))));
        assert!(Tfactors::new(f64::NAN).is_err());
    }

    #[test]
    fn test_too_many_nuclei_for_chapter() {
        // chapter 5 is 2 -> 2; three reactants listed
        let text = single_set("5", "he4 he4 c12 p n15", -1.0, 0.0);
        match Rate::parse(&text, "bad-header") {
            Err(RateError::RateParse { origin, line, field, .. }) => {
                assert_eq!(origin, "bad-header");
                assert_eq!(line, 2);
                assert_eq!(field, "nuclei");
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    /// header line followed by an all-zero set
    fn zero_set(chapter: &str, header: &str) -> String {
        format!(
            "{}\n{}\n{:13.6e}{:13.6e}{:13.6e}{:13.6e}\n{:13.6e}{:13.6e}{:13.6e}\n",
            chapter, header, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0
        )
    }

    #[test]
    fn test_extra_nuclide_without_label_is_rejected() {
        // two reactants declared, three listed, no label
        match Rate::parse(&zero_set("4", " he4 he4 c12 o16 7.16192"), "extra") {
            Err(RateError::RateParse { line, field, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(field, "nuclei");
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
        // too few nuclei for the chapter
        assert!(matches!(
            Rate::parse(&zero_set("4", " he4 c12 7.16192"), "short"),
            Err(RateError::RateParse { field, .. }) if field == "nuclei"
        ));
    }

    #[test]
    fn test_malformed_label_field() {
        for header in [
            " he4 c12 o16 nac2 extra 7.16192",
            " he4 c12 o16 nac2 x 7.16192",
            " he4 c12 o16 nac2xv 7.16192",
            " he4 c12 o16 nac2rq 7.16192",
        ] {
            match Rate::parse(&zero_set("4", header), "label") {
                Err(RateError::RateParse { line, field, .. }) => {
                    assert_eq!(line, 2, "{}", header);
                    assert_eq!(field, "label", "{}", header);
                }
                other => panic!("{}: expected a label error, got {:?}", header, other),
            }
        }
    }

    #[test]
    fn test_column_layout_header() {
        // nuclei in 5-character fields from column 5, label field at column 43
        let header = format!(
            "     {:>5}{:>5}{:>5}{:15}{:8}{}   {:>12}",
            "he4", "c12", "o16", "", "", "nac2r ", "7.16192e+00"
        );
        assert_eq!(header.find("nac2r"), Some(43));
        let rate = Rate::parse(&zero_set("4", &header), "columns").unwrap();
        assert_eq!(rate.to_string(), "he4 + c12 --> o16");
        assert_eq!(rate.label(), "nac2");
        assert!(rate.is_resonant());
        assert_relative_eq!(rate.q_value().unwrap(), 7.16192);

        // a fourth nucleus in the nuclei columns of a capture
        let crowded = format!(
            "     {:>5}{:>5}{:>5}{:>5}{:10}{:8}{}   {:>12}",
            "he4", "he4", "c12", "o16", "", "", "nac2  ", "7.16192e+00"
        );
        assert!(matches!(
            Rate::parse(&zero_set("4", &crowded), "columns"),
            Err(RateError::RateParse { field, .. }) if field == "nuclei"
        ));
    }

    #[test]
    fn test_unsupported_chapter() {
        for code in ["12", "x"] {
            let text = single_set(code, "he4 c12 o16", 0.0, 0.0);
            assert!(matches!(
                Rate::parse(&text, "chapter"),
                Err(RateError::UnsupportedChapter { code: c, .. }) if c == code
            ));
        }
    }

    #[test]
    fn test_bad_coefficient_names_field() {
        let text = C12_AG.replace("1.034110e+02", "x.034110e+02");
        match Rate::parse(&text, "typo") {
            Err(RateError::RateParse { line, field, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(field, "a2");
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_coefficient_count() {
        let text = "4
 he4 c12 o16 nac2 7.16192
 2.546340e+02-1.840970e+00 1.034110e+02
 6.408740e+01-1.246240e+01 1.373030e+02
";
        assert!(matches!(
            Rate::parse(text, "short"),
            Err(RateError::RateParse { field, .. }) if field == "coefficients"
        ));
    }

    #[test]
    fn test_incomplete_set() {
        let text = "4
 he4 c12 o16 nac2 7.16192
 2.546340e+02-1.840970e+00 1.034110e+02-4.205670e+02
";
        assert!(matches!(
            Rate::parse(text, "truncated"),
            Err(RateError::RateParse { field, .. }) if field == "set"
        ));
    }

    #[test]
    fn test_empty_source() {
        assert!(matches!(
            Rate::parse("\n# nothing here\n\n", "empty"),
            Err(RateError::EmptyRate { origin }) if origin == "empty"
        ));
        assert!(matches!(Rate::parse("4\n", "chapter only"), Err(RateError::EmptyRate { .. })));
    }

    #[test]
    fn test_unknown_nuclide() {
        let text = single_set("4", "he4 xx12 o16", 0.0, 0.0);
        assert!(matches!(
            Rate::parse(&text, "unknown"),
            Err(RateError::UnknownNuclide { name, .. }) if name == "xx12"
        ));
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let commented = format!("# alpha capture on carbon\n\n{}\n\n", C12_AG.replace('\n', "\n\n"));
        let plain = Rate::parse(C12_AG, "plain").unwrap();
        let rate = Rate::parse(&commented, "commented").unwrap();
        assert_eq!(rate.sets().unwrap(), plain.sets().unwrap());
    }

    #[test]
    fn test_resonance_and_reverse_flags() {
        let text = "5
         he4  c12    p  n15                  nacrrv   -4.96600e+00
 1.000000e+00 0.000000e+00 0.000000e+00 0.000000e+00
 0.000000e+00 0.000000e+00 0.000000e+00
";
        let rate = Rate::parse(text, "c12-ap-n15").unwrap();
        assert!(rate.is_resonant());
        assert!(rate.is_reverse());
        assert_eq!(rate.sets().unwrap()[0].flag, SetFlag::Resonant);

        // the reverse marker alone, with a blank resonance column
        let text = text.replace("nacrrv", "nacr v");
        let rate = Rate::parse(&text, "c12-ap-n15").unwrap();
        assert!(!rate.is_resonant());
        assert!(rate.is_reverse());
    }

    #[test]
    fn test_source_string_round_trip() {
        let rate = Rate::parse(C12_AG, "c12-ag-o16-nac2").unwrap();
        let written = rate.to_source_string().unwrap();
        let again = Rate::parse(&written, "rewritten").unwrap();
        assert_eq!(again.to_string(), rate.to_string());
        assert_eq!(again.label(), rate.label());
        assert_eq!(again.sets().unwrap(), rate.sets().unwrap());
        assert_relative_eq!(again.eval_at(1.0e9).unwrap(), rate.eval_at(1.0e9).unwrap(), max_relative = 1e-12);
    }

    #[test]
    fn test_library_snapshot_groups_sets() {
        let library = format!("{}{}", C12_AG, TRIPLE_ALPHA);
        assert!(matches!(Rate::parse(&library, "snapshot"), Err(RateError::RateParse { .. })));

        let rates = Rate::parse_all(&library, "snapshot", None).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].sets().unwrap().len(), 2);

        let triple = &rates[1];
        assert_eq!(triple.chapter().unwrap().number(), 8);
        assert_eq!(triple.to_string(), "he4 + he4 + he4 --> c12");
        assert_eq!(triple.sets().unwrap().len(), 3);
        assert!(triple.is_resonant());
        assert_eq!(triple.sets().unwrap()[2].flag, SetFlag::NonResonant);
    }

    #[test]
    fn test_network_helpers() {
        let triple = Rate::parse(TRIPLE_ALPHA, "c12-3a").unwrap();
        assert_relative_eq!(triple.prefactor(), 1.0 / 6.0);
        assert_eq!(triple.dens_exp(), 2);
        assert_eq!(triple.fname(), "he4_he4_he4__c12");

        let capture = Rate::parse(C12_AG, "c12-ag-o16-nac2").unwrap();
        assert_eq!(capture.prefactor(), 1.0);
        assert_eq!(capture.dens_exp(), 1);
        assert_eq!(capture.fname(), "he4_c12__o16");
    }

    #[test]
    fn test_signature_ignores_order_not_direction() {
        let capture = Rate::parse(C12_AG, "c12-ag-o16-nac2").unwrap();
        let he4 = Nucleus::from_name("he4").unwrap();
        let c12 = Nucleus::from_name("c12").unwrap();
        let o16 = Nucleus::from_name("o16").unwrap();
        assert_eq!(
            capture.signature(),
            ReactionSignature::new(&[c12.clone(), he4.clone()], &[o16.clone()])
        );
        assert_ne!(capture.signature(), ReactionSignature::new(&[o16], &[he4, c12]));
    }

    #[test]
    fn test_parse_with_table_annotates_nuclei() {
        let mut table = NuclideTable::new();
        table.insert(2, 4, NuclideProperties { spin: 0.0, mass_excess: 2.42491 });
        let rate = Rate::parse_with_table(C12_AG, "c12-ag-o16-nac2", &table).unwrap();
        let he4 = &rate.reactants()[0];
        assert_eq!(he4.spin(), Some(0.0));
        assert_eq!(he4.mass_excess(), Some(2.42491));
        assert_eq!(rate.reactants()[1].spin(), None);
    }

    #[test]
    fn test_rate_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rate>();
    }
}
