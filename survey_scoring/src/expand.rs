use log::debug;
use snafu::prelude::*;

use crate::config::*;
use crate::error::*;
use crate::registry::Registry;

/// Separates the answer prefix from the original title.
pub const TITLE_SEPARATOR: &str = ": ";

/// Rewrites the graph specifications so that no `sort_by` directive is left.
///
/// A specification sorted by question `q` is replaced, at the same position, by
/// one copy per canonical answer of `q` (in canonical order). Each copy gets an
/// extra filter on that answer and a title prefixed with the answer text.
/// Grids are expanded recursively and must end up with exactly
/// `nrows * ncols` sub-plots.
pub fn expand_graph_specs(
    specs: Vec<GraphSpec>,
    registry: &Registry,
) -> SurveyResult<Vec<GraphSpec>> {
    let mut res: Vec<GraphSpec> = Vec::new();
    for spec in specs {
        res.extend(expand_one(spec, registry)?);
    }
    Ok(res)
}

fn expand_one(spec: GraphSpec, registry: &Registry) -> SurveyResult<Vec<GraphSpec>> {
    match spec.plot {
        Plot::Single(mut config) => match config.sort_by.take() {
            None => Ok(vec![GraphSpec {
                plot: Plot::Single(config),
                ..spec
            }]),
            Some(sort_id) => {
                let base = GraphSpec {
                    plot: Plot::Single(config),
                    ..spec
                };
                sort_by_answers(&base, &sort_id, registry)
            }
        },
        Plot::Grid {
            nrows,
            ncols,
            sub_plots,
        } => {
            let sub_plots = expand_graph_specs(sub_plots, registry)?;
            let expected = nrows * ncols;
            ensure!(
                sub_plots.len() == expected,
                SubPlotCountMismatchSnafu {
                    title: spec.title.clone().unwrap_or_default(),
                    nrows,
                    ncols,
                    expected,
                    actual: sub_plots.len(),
                }
            );
            Ok(vec![GraphSpec {
                plot: Plot::Grid {
                    nrows,
                    ncols,
                    sub_plots,
                },
                ..spec
            }])
        }
    }
}

fn sort_by_answers(
    base: &GraphSpec,
    sort_id: &str,
    registry: &Registry,
) -> SurveyResult<Vec<GraphSpec>> {
    let question = registry.question(sort_id)?;
    let mut res: Vec<GraphSpec> = Vec::new();
    for (idx, answer) in question.answers().iter().enumerate() {
        let mut copy = base.clone();
        if let Plot::Single(config) = &mut copy.plot {
            config.filters.push(FilterSpec {
                id: sort_id.to_string(),
                answers: vec![idx],
            });
        }
        copy.title = Some(prefixed_title(answer, base.title.as_deref()));
        res.push(copy);
    }
    debug!(
        "expand: {:?} sorted by {:?} into {} graphs",
        base.title,
        sort_id,
        res.len()
    );
    Ok(res)
}

fn prefixed_title(answer: &str, title: Option<&str>) -> String {
    let prefix = capitalize(answer);
    match title {
        Some(t) if !t.is_empty() => format!("{}{}{}", prefix, TITLE_SEPARATOR, t),
        _ => prefix,
    }
}

/// Upper-cases the first character and keeps the rest as is.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MemoryTable;
    use crate::registry::ingest;

    fn registry() -> Registry {
        let table = MemoryTable::new(&["Agree", "Color"])
            .row(&["yes", "red"])
            .row(&["no", "blue"]);
        ingest(
            &[
                QuestionDef::new("agree", "Agree", &["yes", "no", "unsure"]),
                QuestionDef::new("color", "Color", &["red", "blue"]),
            ],
            &table,
        )
        .unwrap()
    }

    fn sorted_spec(title: Option<&str>) -> GraphSpec {
        let mut config = ScoreConfig::new("color");
        config.sort_by = Some("agree".to_string());
        GraphSpec::single(title, config)
    }

    fn config_of(spec: &GraphSpec) -> &ScoreConfig {
        match &spec.plot {
            Plot::Single(c) => c,
            Plot::Grid { .. } => panic!("not a single plot"),
        }
    }

    #[test]
    fn one_spec_per_answer() {
        let specs = vec![
            GraphSpec::single(Some("before"), ScoreConfig::new("color")),
            sorted_spec(Some("Colors")),
            GraphSpec::single(Some("after"), ScoreConfig::new("agree")),
        ];
        let res = expand_graph_specs(specs, &registry()).unwrap();
        let titles: Vec<String> = res.iter().map(|s| s.display_title()).collect();
        assert_eq!(
            titles,
            vec![
                "before",
                "Yes: Colors",
                "No: Colors",
                "Unsure: Colors",
                "after"
            ]
        );
        for (idx, spec) in res[1..4].iter().enumerate() {
            let config = config_of(spec);
            assert_eq!(config.sort_by, None);
            assert_eq!(
                config.filters,
                vec![FilterSpec {
                    id: "agree".to_string(),
                    answers: vec![idx],
                }]
            );
        }
    }

    #[test]
    fn existing_filters_are_kept() {
        let mut spec = sorted_spec(None);
        if let Plot::Single(c) = &mut spec.plot {
            c.filters.push(FilterSpec {
                id: "color".to_string(),
                answers: vec![0],
            });
        }
        let res = expand_graph_specs(vec![spec], &registry()).unwrap();
        assert_eq!(res.len(), 3);
        assert_eq!(res[2].title.as_deref(), Some("Unsure"));
        assert_eq!(config_of(&res[2]).filters.len(), 2);
        assert_eq!(config_of(&res[2]).filters[0].id, "color");
    }

    #[test]
    fn grids_are_expanded() {
        let grid = GraphSpec::grid(Some("grid"), 2, 2, vec![
            sorted_spec(Some("Colors")),
            GraphSpec::single(None, ScoreConfig::new("agree")),
        ]);
        let res = expand_graph_specs(vec![grid], &registry()).unwrap();
        assert_eq!(res.len(), 1);
        match &res[0].plot {
            Plot::Grid { sub_plots, .. } => assert_eq!(sub_plots.len(), 4),
            Plot::Single(_) => panic!("expected a grid"),
        }
    }

    #[test]
    fn grid_count_mismatch() {
        let grid = GraphSpec::grid(Some("grid"), 2, 1, vec![sorted_spec(None)]);
        let err = expand_graph_specs(vec![grid], &registry()).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::SubPlotCountMismatch {
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn unknown_sort_question() {
        let mut config = ScoreConfig::new("color");
        config.sort_by = Some("nope".to_string());
        let err = expand_graph_specs(vec![GraphSpec::single(None, config)], &registry())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn capitalization() {
        assert_eq!(capitalize("yes"), "Yes");
        assert_eq!(capitalize("éte"), "Éte");
        assert_eq!(capitalize("USA"), "USA");
        assert_eq!(capitalize(""), "");
    }
}
