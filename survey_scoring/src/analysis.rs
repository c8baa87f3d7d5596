use log::{debug, info, warn};
use snafu::prelude::*;

use crate::config::*;
use crate::error::*;
use crate::expand::expand_graph_specs;
use crate::registry::Registry;

/// Expands the graph specifications and scores every resulting chart.
///
/// Graphs that depend on an optional question absent from the data are skipped.
pub fn analyze(registry: &Registry, specs: Vec<GraphSpec>) -> SurveyResult<Vec<Figure>> {
    let num_specs = specs.len();
    let expanded = expand_graph_specs(specs, registry)?;
    info!(
        "analyze: {} graph specifications expanded into {}",
        num_specs,
        expanded.len()
    );

    let mut figures: Vec<Figure> = Vec::new();
    for spec in expanded.iter() {
        match &spec.plot {
            Plot::Single(config) => {
                if let Some(chart) = build_chart(registry, spec, config)? {
                    figures.push(Figure::Single(chart));
                }
            }
            Plot::Grid {
                nrows,
                ncols,
                sub_plots,
            } => {
                if let Some(charts) = build_grid(registry, spec, sub_plots)? {
                    figures.push(Figure::Grid {
                        title: spec.title.clone(),
                        nrows: *nrows,
                        ncols: *ncols,
                        save_as: spec.save_as.clone(),
                        charts,
                    });
                }
            }
        }
    }
    info!("analyze: {} figures", figures.len());
    Ok(figures)
}

fn build_grid(
    registry: &Registry,
    grid: &GraphSpec,
    sub_plots: &[GraphSpec],
) -> SurveyResult<Option<Vec<Chart>>> {
    let mut charts: Vec<Chart> = Vec::new();
    for sub in sub_plots.iter() {
        let config = match &sub.plot {
            Plot::Single(c) => c,
            Plot::Grid { .. } => {
                return InvalidGraphSpecSnafu {
                    title: grid.display_title(),
                    message: "grids cannot contain other grids",
                }
                .fail();
            }
        };
        match build_chart(registry, sub, config)? {
            Some(chart) => charts.push(chart),
            None => {
                warn!(
                    "analyze: skipping grid {:?}: sub-plot {:?} cannot be drawn",
                    grid.title, sub.title
                );
                return Ok(None);
            }
        }
    }
    Ok(Some(charts))
}

/// Scores one chart, or returns None if it uses a question that was not found
/// in the data.
fn build_chart(
    registry: &Registry,
    spec: &GraphSpec,
    config: &ScoreConfig,
) -> SurveyResult<Option<Chart>> {
    let question = registry.question(&config.id)?;
    let mut referenced = vec![question];
    for f in config.filters.iter() {
        referenced.push(registry.question(&f.id)?);
    }
    if let Some(q) = referenced.iter().find(|q| !q.is_configured()) {
        warn!(
            "analyze: skipping graph {:?}: question {:?} is not in the data",
            spec.title,
            q.prompt()
        );
        return Ok(None);
    }

    let (scores, response_count) = registry.score(config)?;
    let labels = match &spec.bars {
        Some(bars) => {
            ensure!(
                bars.len() == scores.len(),
                InvalidGraphSpecSnafu {
                    title: spec.display_title(),
                    message: format!(
                        "{} bar labels given for {} scores",
                        bars.len(),
                        scores.len()
                    ),
                }
            );
            bars.clone()
        }
        None => question.score_labels(config),
    };
    debug!(
        "analyze: {:?}: scores {:?} over {} responses",
        spec.title, scores, response_count
    );
    Ok(Some(Chart {
        labels,
        scores,
        response_count,
        title: spec.title.clone(),
        x_axis: spec.x_axis.clone(),
        y_axis: spec.y_axis.clone(),
        show_responses: spec.show_responses,
        save_as: spec.save_as.clone(),
    }))
}
