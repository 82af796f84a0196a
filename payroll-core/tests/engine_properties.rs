//! Behavioural properties of the payroll engine, checked over ranges of
//! gross income and several contribution setups.

use payroll_core::{
    ContributionBasis, ContributionConfig, ContributionKind, ContributionRule, NET_TOLERANCE,
    PayrollEngine, ProgressiveTaxCalculator, SocialContributionCalculator, TaxBracket, TaxConfig,
    calculations::common::round_currency,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn raa_contributions() -> ContributionConfig {
    ContributionConfig::new(
        ContributionRule::fixed(dec!(297.25)),
        ContributionRule::disabled(ContributionBasis::Rate(dec!(0.0295))),
        ContributionRule::rate(dec!(0.0387)),
        ContributionRule::disabled(ContributionBasis::Rate(dec!(0.005))),
        ContributionRule::rate(dec!(0.005)),
    )
}

fn uni_contributions() -> ContributionConfig {
    ContributionConfig::new(
        ContributionRule::rate(dec!(0.1025)),
        ContributionRule::rate(dec!(0.0295)),
        ContributionRule::rate(dec!(0.0387)),
        ContributionRule::rate(dec!(0.005)),
        ContributionRule::rate(dec!(0.005)),
    )
}

fn example_tax() -> TaxConfig {
    TaxConfig::new(
        vec![
            TaxBracket::up_to(dec!(13308), dec!(0.0)),
            TaxBracket::up_to(dec!(21617), dec!(0.20)),
            TaxBracket::up_to(dec!(35836), dec!(0.30)),
            TaxBracket::up_to(dec!(69166), dec!(0.40)),
            TaxBracket::up_to(dec!(103072), dec!(0.48)),
            TaxBracket::unbounded(dec!(0.50)),
        ],
        dec!(40.58),
    )
}

/// Setups exercised by the range properties.
fn setups() -> Vec<(&'static str, ContributionConfig, TaxConfig)> {
    vec![
        ("raa", raa_contributions(), example_tax()),
        ("uni", uni_contributions(), example_tax()),
        ("defaults", ContributionConfig::default(), TaxConfig::default()),
    ]
}

/// Whole-euro gross amounts from 0 to 20,000 in steps of 5.
fn gross_range() -> impl Iterator<Item = Decimal> {
    (0..=20_000).step_by(5).map(Decimal::from)
}

/// Every on/off combination of the five categories over the uni rates.
fn toggle_combinations() -> impl Iterator<Item = ContributionConfig> {
    (0u8..32).map(|mask| {
        let base = uni_contributions();
        let toggle = |bit: u8, rule: ContributionRule| ContributionRule {
            enabled: mask & (1 << bit) != 0,
            ..rule
        };
        ContributionConfig::new(
            toggle(0, base.pension),
            toggle(1, base.unemployment),
            toggle(2, base.health),
            toggle(3, base.union_levy),
            toggle(4, base.housing_levy),
        )
    })
}

// =============================================================================
// Contributions
// =============================================================================

#[test]
fn disabled_categories_contribute_nothing() {
    for config in toggle_combinations() {
        let breakdown = SocialContributionCalculator::new(&config).calculate(dec!(3456.78));

        for kind in ContributionKind::ALL {
            if !config.rule(kind).enabled {
                assert_eq!(breakdown.amount(kind), dec!(0), "{kind} should be zero");
            }
        }
    }
}

#[test]
fn total_is_sum_of_rounded_categories() {
    for config in toggle_combinations() {
        for gross in [dec!(0.25), dec!(940.98), dec!(3456.78), dec!(12345.67)] {
            let breakdown = SocialContributionCalculator::new(&config).calculate(gross);

            let expected: Decimal = ContributionKind::ALL
                .iter()
                .map(|kind| match config.rule(*kind) {
                    rule if !rule.enabled => Decimal::ZERO,
                    ContributionRule {
                        basis: ContributionBasis::Rate(rate),
                        ..
                    } => round_currency(gross * *rate),
                    ContributionRule {
                        basis: ContributionBasis::Fixed(amount),
                        ..
                    } => round_currency(*amount),
                })
                .sum();

            assert_eq!(breakdown.total, round_currency(expected));
        }
    }
}

// =============================================================================
// Tax
// =============================================================================

#[test]
fn tax_is_zero_at_bracket_boundary_and_half_a_unit_above() {
    let config = TaxConfig::new(
        vec![
            TaxBracket::up_to(dec!(12000), dec!(0.0)),
            TaxBracket::unbounded(dec!(0.5)),
        ],
        dec!(0),
    );
    let calculator = ProgressiveTaxCalculator::new(&config);

    assert_eq!(calculator.calculate(dec!(1000)), dec!(0.00));
    assert_eq!(calculator.calculate(dec!(1001)), dec!(0.50));
}

#[test]
fn credit_larger_than_tax_never_goes_negative() {
    let config = TaxConfig {
        tax_credit: dec!(100000),
        ..example_tax()
    };
    let calculator = ProgressiveTaxCalculator::new(&config);

    for taxable in gross_range() {
        let tax = calculator.calculate(taxable);
        assert_eq!(tax, dec!(0.00));
        assert!(!tax.is_sign_negative());
    }
}

// =============================================================================
// Forward pipeline
// =============================================================================

#[test]
fn net_never_exceeds_gross() {
    for (name, contributions, tax) in setups() {
        let engine = PayrollEngine::new(&contributions, &tax);

        for gross in gross_range() {
            let result = engine.gross_to_net(gross);
            assert!(result.net <= gross, "{name}: net {} > gross {gross}", result.net);
        }
    }
}

#[test]
fn net_is_non_decreasing_in_gross() {
    for (name, contributions, tax) in setups() {
        let engine = PayrollEngine::new(&contributions, &tax);
        let mut previous: Option<Decimal> = None;

        for gross in gross_range() {
            let net = engine.gross_to_net(gross).net;
            if let Some(previous) = previous {
                assert!(
                    net >= previous,
                    "{name}: net fell from {previous} to {net} at gross {gross}"
                );
            }
            previous = Some(net);
        }
    }
}

#[test]
fn result_parts_reconcile() {
    for (_, contributions, tax) in setups() {
        let engine = PayrollEngine::new(&contributions, &tax);

        for gross in [dec!(940.98), dec!(2500), dec!(4500), dec!(15000)] {
            let result = engine.gross_to_net(gross);

            assert_eq!(
                result.net,
                result.gross - result.contributions.total - result.income_tax
            );
        }
    }
}

// =============================================================================
// Inverse search
// =============================================================================

#[test]
fn inverse_recovers_gross_within_a_cent() {
    let cases = [
        (raa_contributions(), dec!(940.98)),
        (raa_contributions(), dec!(1500)),
        (raa_contributions(), dec!(3000)),
        (raa_contributions(), dec!(4500.0)),
        (raa_contributions(), dec!(6000)),
        (uni_contributions(), dec!(940.98)),
        (uni_contributions(), dec!(1500)),
        (uni_contributions(), dec!(3000)),
    ];
    let tax = example_tax();

    for (contributions, gross) in cases {
        let engine = PayrollEngine::new(&contributions, &tax);
        let net = engine.gross_to_net(gross).net;

        let result = engine.net_to_gross(net, None);

        assert!(result.converged);
        assert!(
            (result.guessed_gross - gross).abs() <= dec!(0.01),
            "gross {gross} came back as {}",
            result.guessed_gross
        );
    }
}

#[test]
fn inverse_result_nets_within_tolerance_of_target() {
    let tax = example_tax();
    let contributions = uni_contributions();
    let engine = PayrollEngine::new(&contributions, &tax);

    for target in [dec!(500), dec!(1234.56), dec!(1876.30), dec!(2953.27), dec!(4000)] {
        let result = engine.net_to_gross(target, None);

        assert!(result.converged);
        assert!((result.payroll.net - target).abs() <= NET_TOLERANCE);
        assert_eq!(result.net_difference, result.payroll.net - target);
    }
}

#[test]
fn inverse_never_fails_on_pathological_config() {
    let contributions = ContributionConfig::new(
        ContributionRule::rate(dec!(5)),
        ContributionRule::rate(dec!(5)),
        ContributionRule::rate(dec!(5)),
        ContributionRule::rate(dec!(5)),
        ContributionRule::rate(dec!(5)),
    );
    let tax = example_tax();
    let engine = PayrollEngine::new(&contributions, &tax);

    let result = engine.net_to_gross(dec!(2000), None);

    assert!(!result.converged);
    assert_eq!(result.iterations, 60);
    assert!(!result.net_difference.is_zero());
}

#[test]
fn engine_is_shareable_across_threads() {
    let contributions = raa_contributions();
    let tax = example_tax();
    let engine = PayrollEngine::new(&contributions, &tax);

    let nets: Vec<Decimal> = std::thread::scope(|scope| {
        let handles: Vec<_> = [dec!(1500), dec!(3000), dec!(4500)]
            .into_iter()
            .map(|gross| {
                let engine = &engine;
                scope.spawn(move || engine.gross_to_net(gross).net)
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    assert_eq!(nets, vec![dec!(1137.20), dec!(2242.68), dec!(3144.82)]);
}
