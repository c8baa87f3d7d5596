// JSON rendering of the figures.

use crate::survey::*;

use serde_json::json;
use serde_json::Map as JSMap;

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    Directory(PathBuf),
}

pub const SUMMARY_FILE_NAME: &str = "summary.json";

fn chart_to_json(chart: &Chart) -> JSValue {
    let mut js: JSMap<String, JSValue> = JSMap::new();
    if let Some(t) = &chart.title {
        js.insert("title".to_string(), json!(t));
    }
    if let Some(x) = &chart.x_axis {
        js.insert("xAxis".to_string(), json!(x));
    }
    if let Some(y) = &chart.y_axis {
        js.insert("yAxis".to_string(), json!(y));
    }
    js.insert("labels".to_string(), json!(chart.labels));
    js.insert("scores".to_string(), json!(chart.scores));
    if chart.show_responses {
        js.insert("responses".to_string(), json!(chart.response_count));
    }
    JSValue::Object(js)
}

fn figure_to_json(figure: &Figure) -> JSValue {
    match figure {
        Figure::Single(chart) => chart_to_json(chart),
        Figure::Grid {
            title,
            nrows,
            ncols,
            charts,
            ..
        } => {
            let sub_plots: Vec<JSValue> = charts.iter().map(chart_to_json).collect();
            json!({"title": title, "nrows": nrows, "ncols": ncols, "subPlots": sub_plots})
        }
    }
}

fn figure_save_as(figure: &Figure) -> Option<&String> {
    match figure {
        Figure::Single(chart) => chart.save_as.as_ref(),
        Figure::Grid { save_as, .. } => save_as.as_ref(),
    }
}

pub fn build_summary_js(registry: &Registry, figures: &[Figure]) -> JSValue {
    let figures_js: Vec<JSValue> = figures.iter().map(figure_to_json).collect();
    json!({
        "respondents": registry.num_respondents(),
        "unmatched": registry.unmatched_answers(),
        "figures": figures_js
    })
}

fn write_file(p: &Path, contents: &str) -> AppResult<()> {
    let path = p.display().to_string();
    debug!("write_file: {:?}", path);
    fs::write(p, contents).context(WritingOutputSnafu { path })
}

/// Writes the summary, and one file per figure that has a `save-as` target.
pub fn write_outputs(target: &OutputTarget, figures: &[Figure], summary: &str) -> AppResult<()> {
    match target {
        OutputTarget::Stdout => {
            println!("summary:{}", summary);
            Ok(())
        }
        OutputTarget::Directory(dir) => {
            fs::create_dir_all(dir).context(WritingOutputSnafu {
                path: dir.display().to_string(),
            })?;
            write_file(&dir.join(SUMMARY_FILE_NAME), summary)?;
            for figure in figures.iter() {
                if let Some(save_as) = figure_save_as(figure) {
                    let p = dir.join(save_as).with_extension("json");
                    let contents = serde_json::to_string_pretty(&figure_to_json(figure))
                        .context(SerializingJsonSnafu {})?;
                    write_file(&p, &contents)?;
                }
            }
            info!("Results written to {:?}", dir);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Chart {
        Chart {
            labels: vec!["red".to_string(), "blue".to_string()],
            scores: vec![0.25, 0.75],
            response_count: 4.0,
            title: Some("Colors".to_string()),
            x_axis: None,
            y_axis: Some("Share".to_string()),
            show_responses: true,
            save_as: Some("colors.png".to_string()),
        }
    }

    #[test]
    fn chart_json() {
        assert_eq!(
            chart_to_json(&chart()),
            json!({
                "title": "Colors",
                "yAxis": "Share",
                "labels": ["red", "blue"],
                "scores": [0.25, 0.75],
                "responses": 4.0
            })
        );
        let mut hidden = chart();
        hidden.show_responses = false;
        assert!(chart_to_json(&hidden).get("responses").is_none());
    }

    #[test]
    fn grid_json() {
        let figure = Figure::Grid {
            title: None,
            nrows: 1,
            ncols: 1,
            save_as: None,
            charts: vec![chart()],
        };
        let js = figure_to_json(&figure);
        assert_eq!(js["nrows"], json!(1));
        assert_eq!(js["subPlots"].as_array().map(|a| a.len()), Some(1));
        assert_eq!(figure_save_as(&figure), None);
    }

    #[test]
    fn saved_files() {
        let dir = std::env::temp_dir().join(format!("surveytally-{}", std::process::id()));
        let figures = vec![Figure::Single(chart())];
        write_outputs(&OutputTarget::Directory(dir.clone()), &figures, "{}").unwrap();
        assert_eq!(fs::read_to_string(dir.join(SUMMARY_FILE_NAME)).unwrap(), "{}");
        let saved = fs::read_to_string(dir.join("colors.json")).unwrap();
        assert!(saved.contains("\"Colors\""));
        fs::remove_dir_all(dir).unwrap();
    }
}
