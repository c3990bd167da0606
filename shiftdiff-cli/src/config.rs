//! JSON configuration mirroring the library's parameter structs.

use serde::{Deserialize, Serialize};
use shiftdiff::render::Rgb;
use shiftdiff::{Backend, MatchConfig, Metric, Params, RenderStyle, Roi};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricConfig {
    Ccorr,
    Zncc,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Ccorr => Metric::Ccorr,
            MetricConfig::Zncc => Metric::Zncc,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendConfig {
    Fourier,
    Direct,
}

impl From<BackendConfig> for Backend {
    fn from(value: BackendConfig) -> Self {
        match value {
            BackendConfig::Fourier => Backend::Fourier,
            BackendConfig::Direct => Backend::Direct,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct RoiJson {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl From<RoiJson> for Roi {
    fn from(value: RoiJson) -> Self {
        Roi::new(value.x, value.y, value.width, value.height)
    }
}

impl From<Roi> for RoiJson {
    fn from(value: Roi) -> Self {
        Self {
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParamsJson {
    pub reference: RoiJson,
    pub template: RoiJson,
    pub threshold: u8,
    pub morph_radius: u8,
    pub min_area: u32,
}

impl Default for ParamsJson {
    fn default() -> Self {
        let params = Params::default();
        Self {
            reference: params.reference.into(),
            template: params.template.into(),
            threshold: params.threshold,
            morph_radius: params.morph_radius,
            min_area: params.min_area,
        }
    }
}

impl From<ParamsJson> for Params {
    fn from(value: ParamsJson) -> Self {
        Params {
            reference: value.reference.into(),
            template: value.template.into(),
            threshold: value.threshold,
            morph_radius: value.morph_radius,
            min_area: value.min_area,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MatchConfigJson {
    pub metric: MetricConfig,
    pub backend: BackendConfig,
    pub parallel: bool,
    pub topk: usize,
    pub nms_radius: usize,
    pub min_var_i: f64,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            metric: MetricConfig::Ccorr,
            backend: BackendConfig::Fourier,
            parallel: cfg.parallel,
            topk: cfg.topk,
            nms_radius: cfg.nms_radius,
            min_var_i: cfg.min_var_i,
        }
    }
}

impl From<MatchConfigJson> for MatchConfig {
    fn from(value: MatchConfigJson) -> Self {
        MatchConfig {
            metric: value.metric.into(),
            backend: value.backend.into(),
            parallel: value.parallel,
            topk: value.topk,
            nms_radius: value.nms_radius,
            min_var_i: value.min_var_i,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderJson {
    pub highlight: [u8; 3],
    pub region_width: u32,
    pub template_width: u32,
    pub contour_width: u32,
    pub palette_seed: u64,
}

impl Default for RenderJson {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            highlight: style.highlight.0,
            region_width: style.region_width,
            template_width: style.template_width,
            contour_width: style.contour_width,
            palette_seed: style.palette_seed,
        }
    }
}

impl From<RenderJson> for RenderStyle {
    fn from(value: RenderJson) -> Self {
        RenderStyle {
            highlight: Rgb(value.highlight),
            region_width: value.region_width,
            template_width: value.template_width,
            contour_width: value.contour_width,
            palette_seed: value.palette_seed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reference_path: PathBuf,
    pub compare_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub params: ParamsJson,
    #[serde(rename = "match")]
    pub match_cfg: MatchConfigJson,
    pub render: RenderJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_path: PathBuf::from("reference.tiff"),
            compare_path: PathBuf::from("compare.tiff"),
            output_dir: None,
            report_path: None,
            params: ParamsJson::default(),
            match_cfg: MatchConfigJson::default(),
            render: RenderJson::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use shiftdiff::{Backend, MatchConfig, Metric, Params, Roi};

    #[test]
    fn example_config_parses() {
        let text = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));
        let config: Config = serde_json::from_str(text).unwrap();
        assert_eq!(config.output_dir.as_deref(), Some(std::path::Path::new("previews")));
        let params: Params = config.params.into();
        assert_eq!(params, Params::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let json = r#"{
            "params": { "threshold": 12 },
            "match": { "metric": "zncc", "backend": "direct" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let params: Params = config.params.into();
        assert_eq!(params.threshold, 12);
        assert_eq!(params.template, Roi::new(1085, 100, 100, 300));
        let cfg: MatchConfig = config.match_cfg.into();
        assert_eq!(cfg.metric, Metric::Zncc);
        assert_eq!(cfg.backend, Backend::Direct);
        assert_eq!(cfg.topk, 3);
    }
}
