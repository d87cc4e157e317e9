//! Age-stratified IFR estimates published in the literature.
//!
//! Rates are percentages. Open-ended top brackets end at [`MAXAGE`].
use crate::{
    model::literal,
    prelude::{IfrModel, Real, MAXAGE},
};

const M: u8 = MAXAGE;

/// Fraction of influenza infections that are symptomatic.
///
/// CDC burden estimates only count symptomatic illnesses; dividing deaths by
/// illnesses and scaling by this fraction gives deaths per infection. Studies
/// place the asymptomatic fraction between 65% and 85%.
pub const FLU_SYMPTOMATIC_FRACTION: Real = 0.33;

/// Derived from the Spanish ENE-COVID serosurvey (see `calc_ifr`).
pub fn ene_covid() -> IfrModel {
    literal(
        "ENE-COVID",
        &[
            (0, 9, 0.003),
            (10, 19, 0.004),
            (20, 29, 0.015),
            (30, 39, 0.030),
            (40, 49, 0.064),
            (50, 59, 0.213),
            (60, 69, 0.718),
            (70, 79, 2.384),
            (80, 89, 8.466),
            (90, M, 12.497),
        ],
    )
}

/// US CDC planning scenarios, 10 Sep 2020 (table 1).
pub fn us_cdc() -> IfrModel {
    literal(
        "US CDC",
        &[(0, 19, 0.003), (20, 49, 0.02), (50, 69, 0.5), (70, M, 5.4)],
    )
}

/// Verity et al., Lancet Infectious Diseases 2020 (table 1).
pub fn verity() -> IfrModel {
    literal(
        "Verity",
        &[
            (0, 9, 0.00161),
            (10, 19, 0.00695),
            (20, 29, 0.0309),
            (30, 39, 0.0844),
            (40, 49, 0.161),
            (50, 59, 0.595),
            (60, 69, 1.93),
            (70, 79, 4.28),
            (80, M, 7.80),
        ],
    )
}

/// Levin et al., medRxiv 2020.07.23.20160895v7 (table 3).
pub fn levin() -> IfrModel {
    literal(
        "Levin",
        &[
            (0, 34, 0.004),
            (35, 44, 0.068),
            (45, 54, 0.23),
            (55, 64, 0.75),
            (65, 74, 2.5),
            (75, 84, 8.5),
            (85, M, 28.3),
        ],
    )
}

/// Salje et al., Science 369:208 (table S2).
pub fn salje() -> IfrModel {
    literal(
        "Salje",
        &[
            (0, 19, 0.001),
            (20, 29, 0.005),
            (30, 39, 0.02),
            (40, 49, 0.05),
            (50, 59, 0.2),
            (60, 69, 0.7),
            (70, 79, 1.9),
            (80, M, 8.3),
        ],
    )
}

/// Perez-Saez et al., Lancet Infectious Diseases 2020. No data under 5.
pub fn perez_saez() -> IfrModel {
    literal(
        "Perez-Saez",
        &[
            (5, 9, 0.0016),
            (10, 19, 0.00032),
            (20, 49, 0.0092),
            (50, 64, 0.14),
            (65, M, 5.6),
        ],
    )
}

/// Picon et al., PMC7493765 (table 2). No data under 20.
pub fn picon() -> IfrModel {
    literal("Picon", &[(20, 39, 0.08), (40, 59, 0.24), (60, M, 4.63)])
}

/// Poletti et al., Eurosurveillance 25(31) (table 1, "any time").
///
/// Estimated IFR is zero under 50, so the curve has no estimate below the
/// 50-59 midpoint.
pub fn poletti() -> IfrModel {
    literal(
        "Poletti",
        &[
            (0, 19, 0.0),
            (20, 49, 0.0),
            (50, 59, 0.46),
            (60, 69, 1.42),
            (70, 79, 6.87),
            (80, M, 18.35),
        ],
    )
}

/// Gudbjartsson et al., NEJM 2020 (table S7).
pub fn gudbjartsson() -> IfrModel {
    literal(
        "Gudbjartsson",
        &[(0, 70, 0.1), (71, 80, 2.4), (81, M, 11.2)],
    )
}

/// Public Health Agency of Sweden, Stockholm technical report (table B.1).
pub fn phas() -> IfrModel {
    literal(
        "PHAS",
        &[
            (0, 49, 0.01),
            (50, 59, 0.27),
            (60, 69, 0.45),
            (70, 79, 1.92),
            (80, 89, 7.20),
            (90, M, 16.21),
        ],
    )
}

/// O'Driscoll et al., Nature 2020 (table S3).
pub fn odriscoll() -> IfrModel {
    literal(
        "O'Driscoll",
        &[
            (0, 4, 0.003),
            (5, 9, 0.001),
            (10, 14, 0.001),
            (15, 19, 0.003),
            (20, 24, 0.006),
            (25, 29, 0.013),
            (30, 34, 0.024),
            (35, 39, 0.040),
            (40, 44, 0.075),
            (45, 49, 0.121),
            (50, 54, 0.207),
            (55, 59, 0.323),
            (60, 64, 0.456),
            (65, 69, 1.075),
            (70, 74, 1.674),
            (75, 79, 3.203),
            (80, M, 8.292),
        ],
    )
}

/// Ward et al., REACT2 study (table S2a, confirmed deaths). No data under 15.
pub fn react2() -> IfrModel {
    literal(
        "REACT2",
        &[(15, 44, 0.03), (45, 64, 0.52), (65, 74, 3.87), (75, M, 18.71)],
    )
}

/// Yang et al., New York City spring 2020 (table 1).
pub fn yang() -> IfrModel {
    literal(
        "Yang",
        &[
            (0, 24, 0.0097),
            (25, 44, 0.12),
            (45, 64, 0.94),
            (65, 74, 4.87),
            (75, M, 14.17),
        ],
    )
}

/// Molenberghs et al., Belgium (table 6).
pub fn molenberghs() -> IfrModel {
    literal(
        "Molenberghs",
        &[
            (0, 24, 0.0005),
            (25, 44, 0.017),
            (45, 64, 0.21),
            (65, 74, 2.24),
            (75, 84, 4.29),
            (85, M, 11.77),
        ],
    )
}

/// Every built-in COVID-19 model.
pub fn covid_models() -> Vec<IfrModel> {
    vec![
        ene_covid(),
        us_cdc(),
        verity(),
        levin(),
        salje(),
        perez_saez(),
        picon(),
        poletti(),
        gudbjartsson(),
        phas(),
        odriscoll(),
        react2(),
        yang(),
        molenberghs(),
    ]
}

/// Deaths and symptomatic illnesses per age group in one US influenza season.
struct FluSeason {
    name: &'static str,
    deaths: [Real; 5],
    illnesses: [Real; 5],
}

const FLU_BRACKETS: [(u8, u8); 5] = [(0, 4), (5, 17), (18, 49), (50, 64), (65, M)];

/// US CDC influenza burden estimates, seasons 2014-2015 to 2019-2020.
const FLU_SEASONS: [FluSeason; 6] = [
    FluSeason {
        name: "US CDC 2019-2020",
        deaths: [254.0, 180.0, 2_669.0, 5_133.0, 13_673.0],
        illnesses: [4_291_677.0, 8_214_257.0, 15_325_708.0, 8_416_702.0, 1_946_161.0],
    },
    FluSeason {
        name: "US CDC 2018-2019",
        deaths: [266.0, 211.0, 2_450.0, 5_676.0, 25_555.0],
        illnesses: [3_633_104.0, 7_663_310.0, 11_913_203.0, 9_238_038.0, 3_073_227.0],
    },
    FluSeason {
        name: "US CDC 2017-2018",
        deaths: [115.0, 528.0, 2_803.0, 6_751.0, 50_903.0],
        illnesses: [3_678_342.0, 7_512_601.0, 14_428_065.0, 13_237_932.0, 5_945_690.0],
    },
    FluSeason {
        name: "US CDC 2016-2017",
        deaths: [126.0, 125.0, 1_365.0, 3_780.0, 32_833.0],
        illnesses: [2_381_218.0, 6_452_110.0, 9_292_804.0, 7_448_184.0, 3_646_206.0],
    },
    FluSeason {
        name: "US CDC 2015-2016",
        deaths: [180.0, 88.0, 1_703.0, 3_277.0, 17_458.0],
        illnesses: [2_195_276.0, 4_140_269.0, 9_121_242.0, 6_640_358.0, 1_407_174.0],
    },
    FluSeason {
        name: "US CDC 2014-2015",
        deaths: [396.0, 407.0, 985.0, 4_780.0, 44_808.0],
        illnesses: [3_207_314.0, 6_388_401.0, 8_606_083.0, 7_283_766.0, 4_679_888.0],
    },
];

impl FluSeason {
    fn model(&self, symptomatic: Real) -> IfrModel {
        let rates: Vec<(u8, u8, Real)> = FLU_BRACKETS
            .iter()
            .enumerate()
            .map(|(i, &(lo, hi))| {
                let ifr = self.deaths[i] / self.illnesses[i] * 100.0 * symptomatic;
                (lo, hi, ifr)
            })
            .collect();
        literal(self.name, &rates)
    }
}

/// Seasonal influenza models, one per season, most recent first.
pub fn flu_models(symptomatic: Real) -> Vec<IfrModel> {
    FLU_SEASONS.iter().map(|s| s.model(symptomatic)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn builtin_models_are_valid() {
        let covid = covid_models();
        assert_eq!(covid.len(), 14);
        let partial = ["Perez-Saez", "Picon", "REACT2"];
        for m in covid.iter().filter(|m| !partial.contains(&m.name().as_str())) {
            assert!(m.covers(MAXAGE), "{} does not cover all ages", m.name());
        }
        assert!(!picon().covers(MAXAGE));
    }

    #[test]
    fn flu_rates_scale_with_symptomatic_fraction() {
        let flu = flu_models(FLU_SYMPTOMATIC_FRACTION);
        assert_eq!(flu.len(), 6);
        assert_eq!(flu[0].name(), "US CDC 2019-2020");
        let expected = 13_673.0 / 1_946_161.0 * 100.0 * 0.33;
        assert_approx_eq!(flu[0].rate(80).unwrap(), expected, 1e-12);

        let flu1 = flu_models(1.0);
        assert_approx_eq!(flu1[0].rate(80).unwrap() * 0.33, expected, 1e-12);
        assert!(flu.iter().all(|m| m.covers(MAXAGE)));
    }
}
