//! Plain-text and CSV renderings of computed rates.
use crate::{
    combine::FoldComparison,
    prelude::{Age, IfrModel, InputError, RateTable, Real},
    utils::render_log_hbars,
};
use serde::Serialize;

/// Overall rate table, one column per model and one row per region.
///
/// Rows are sorted by decreasing rate of model column `sort_by`. The header
/// is repeated as a footer so long tables stay readable.
pub fn render_rate_table(table: &RateTable, sort_by: usize) -> String {
    let header = {
        let mut h = String::new();
        for m in table.models() {
            h.push_str(&format!("| {:>13} ", m));
        }
        h.push_str("| Region |\n");
        h
    };

    let mut out = header.clone();
    for i in table.order_by(sort_by) {
        for x in table.row(i).iter() {
            out.push_str(&format!("| {:13.3} ", x));
        }
        out.push_str(&format!("| {} |\n", table.regions()[i]));
    }
    out.push_str(&header);
    return out;
}

#[derive(Serialize)]
struct PointRecord<'a> {
    model: &'a str,
    age: Real,
    rate: Real,
}

#[derive(Serialize)]
struct FoldRecord {
    age: Real,
    baseline: Real,
    other: Real,
    fold: Real,
}

fn to_csv<S, I>(records: I) -> Result<String, InputError>
where
    S: Serialize,
    I: IntoIterator<Item = S>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for r in records {
        wtr.serialize(r)?;
    }
    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    return Ok(String::from_utf8_lossy(&data).into_owned());
}

/// Chart series of each model, one (model, age, rate) line per sample point
/// placed at the bracket midpoint.
pub fn series_csv(models: &[IfrModel]) -> Result<String, InputError> {
    to_csv(models.iter().flat_map(|m| {
        m.points().map(move |(age, rate)| PointRecord {
            model: m.name(),
            age,
            rate,
        })
    }))
}

/// Consensus curve as a CSV series named `name`.
pub fn curve_csv(name: &str, curve: &[(Real, Real)]) -> Result<String, InputError> {
    to_csv(curve.iter().map(|&(age, rate)| PointRecord {
        model: name,
        age,
        rate,
    }))
}

pub fn folds_csv(folds: &[FoldComparison]) -> Result<String, InputError> {
    to_csv(folds.iter().map(|f| FoldRecord {
        age: f.age(),
        baseline: f.baseline(),
        other: f.other(),
        fold: f.fold(),
    }))
}

/// One line per compared age: both consensus rates and their ratio.
pub fn render_folds(folds: &[FoldComparison], baseline: &str, other: &str) -> String {
    let mut out = String::new();
    for f in folds {
        out.push_str(&format!(
            "Age {:3}: {} {:.4}%, {} {:.4}%, {:.1}x\n",
            f.age(),
            baseline,
            f.baseline(),
            other,
            f.other(),
            f.fold()
        ));
    }
    return out;
}

/// Log-scale bars of a model, one per bracket.
pub fn render_model_bars(model: &IfrModel, maxage: Age, width: usize) -> String {
    let values: Vec<(String, Real)> = model
        .rates()
        .iter()
        .map(|(b, r)| (b.label(maxage), *r))
        .collect();
    return format!("{}\n{}", model.name(), render_log_hbars(&values, width));
}

/// Log-scale bars of a consensus curve, one per age.
pub fn render_curve_bars(curve: &[(Real, Real)], width: usize) -> String {
    let values: Vec<(String, Real)> = curve
        .iter()
        .map(|(age, r)| (format!("{}", age), *r))
        .collect();
    render_log_hbars(&values, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bracket::br, literature, prelude::*};

    fn models() -> Vec<IfrModel> {
        vec![
            IfrModel::new("low", vec![(br(0, 49), 0.1), (br(50, 99), 1.0)]).unwrap(),
            IfrModel::new("high", vec![(br(0, 49), 1.0), (br(50, 99), 10.0)]).unwrap(),
        ]
    }

    #[test]
    fn rate_table() {
        let young = Pyramid::new(vec![(br(0, 49), 900.0), (br(50, 99), 100.0)], 99).unwrap();
        let old = Pyramid::new(vec![(br(0, 49), 100.0), (br(50, 99), 900.0)], 99).unwrap();
        let regions = vec![("Young".to_string(), young), ("Old".to_string(), old)];
        let table = RateTable::compute(&RateAggregator::default(), &regions, &models()).unwrap();
        let out = render_rate_table(&table, 0);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "|           low |          high | Region |");
        assert_eq!(lines[1], "|         0.910 |         9.100 | Old |");
        assert_eq!(lines[2], "|         0.190 |         1.900 | Young |");
        assert_eq!(lines[3], lines[0]);
    }

    #[test]
    fn chart_series() {
        let csv = series_csv(&models()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "model,age,rate");
        assert_eq!(lines[1], "low,24.5,0.1");
        assert_eq!(lines[4], "high,74.5,10.0");
        assert_eq!(lines.len(), 5);

        let curve = curve_csv("mean", &[(30.0, 0.5)]).unwrap();
        assert_eq!(curve, "model,age,rate\nmean,30.0,0.5\n");
    }

    #[test]
    fn folds() {
        let covid = literature::covid_models();
        let flu = literature::flu_models(literature::FLU_SYMPTOMATIC_FRACTION);
        let folds = FoldComparison::compute(
            vec![30.0, 60.0],
            &ModelCombiner::new(&flu),
            &ModelCombiner::new(&covid),
        )
        .unwrap();
        let text = render_folds(&folds, "flu", "covid");
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("Age  30: flu "));
        let csv = folds_csv(&folds).unwrap();
        assert!(csv.starts_with("age,baseline,other,fold\n30.0,"));
    }

    #[test]
    fn bars() {
        let out = render_model_bars(&models()[0], 99, 10);
        assert_eq!(out, "low\n0-49 |= 0.1000\n 50+ |=========== 1.0000\n");
        let curve = render_curve_bars(&[(30.0, 1.0), (40.0, 10.0)], 4);
        assert_eq!(curve, "30 |= 1.0000\n40 |===== 10.0000\n");
    }
}
